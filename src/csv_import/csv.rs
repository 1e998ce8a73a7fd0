//! Parsing of exported transaction CSV files.
//!
//! The file must have a header with the columns `Date`, `Transaction Description`,
//! `Category`, `Amount` and `Type`, in any order. Other columns are ignored.

use csv::{ReaderBuilder, StringRecord, Trim};
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{Error, category::CategoryName};

const DATE_COLUMN: &str = "Date";
const DESCRIPTION_COLUMN: &str = "Transaction Description";
const CATEGORY_COLUMN: &str = "Category";
const AMOUNT_COLUMN: &str = "Amount";
const TYPE_COLUMN: &str = "Type";

/// The columns every import file must have.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    DATE_COLUMN,
    DESCRIPTION_COLUMN,
    CATEGORY_COLUMN,
    AMOUNT_COLUMN,
    TYPE_COLUMN,
];

const DATE_TIME_FORMATS: [&[BorrowedFormatItem]; 4] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

const DATE_FORMATS: [&[BorrowedFormatItem]; 3] = [
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]/[month]/[day]"),
    format_description!("[month]/[day]/[year]"),
];

/// A transaction read from an import file, not yet tied to a category ID.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub date: PrimitiveDateTime,
    pub description: Option<String>,
    pub category: CategoryName,
    /// Negative for rows whose type is an expense, positive otherwise.
    pub amount: f64,
}

/// Column positions of the required fields within a record.
struct ColumnIndices {
    date: usize,
    description: usize,
    category: usize,
    amount: usize,
    type_: usize,
}

impl ColumnIndices {
    fn from_header(header: &StringRecord) -> Result<Self, Error> {
        let position = |name: &str| header.iter().position(|column| column == name);

        match (
            position(DATE_COLUMN),
            position(DESCRIPTION_COLUMN),
            position(CATEGORY_COLUMN),
            position(AMOUNT_COLUMN),
            position(TYPE_COLUMN),
        ) {
            (Some(date), Some(description), Some(category), Some(amount), Some(type_)) => {
                Ok(Self {
                    date,
                    description,
                    category,
                    amount,
                    type_,
                })
            }
            _ => Err(Error::MissingCSVColumns(
                REQUIRED_COLUMNS.iter().map(|&column| column.to_owned()).collect(),
            )),
        }
    }
}

/// Parse the rows of a transaction CSV file.
///
/// # Errors
/// Returns [Error::MissingCSVColumns] if the header lacks a required column and
/// [Error::InvalidCSV] if any row cannot be parsed. No rows are returned when
/// any row is invalid.
pub fn parse_csv(text: &str) -> Result<Vec<ImportRow>, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(format!("could not read the header: {error}")))?;
    let columns = ColumnIndices::from_header(header)?;

    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // The header is line 1.
        let line = index + 2;
        let record = record.map_err(|error| Error::InvalidCSV(format!("line {line}: {error}")))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        rows.push(parse_record(&record, &columns).map_err(|reason| {
            tracing::debug!("rejected CSV line {line}: {reason}");
            Error::InvalidCSV(format!("line {line}: {reason}"))
        })?);
    }

    Ok(rows)
}

fn parse_record(record: &StringRecord, columns: &ColumnIndices) -> Result<ImportRow, String> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    let date = parse_date(field(columns.date))
        .ok_or_else(|| format!("invalid date '{}'", field(columns.date)))?;

    let amount = field(columns.amount)
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| format!("invalid amount '{}'", field(columns.amount)))?;

    let amount = if is_expense(field(columns.type_)) {
        -amount.abs()
    } else {
        amount.abs()
    };

    let category = CategoryName::new(field(columns.category))
        .map_err(|_| "the category is empty".to_owned())?;

    let description = Some(field(columns.description))
        .filter(|description| !description.is_empty())
        .map(str::to_owned);

    Ok(ImportRow {
        date,
        description,
        category,
        amount,
    })
}

fn is_expense(type_: &str) -> bool {
    type_.to_lowercase().contains("expense")
}

/// Parse a date or date-time, dates without a time are set to midnight.
fn parse_date(text: &str) -> Option<PrimitiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| Date::parse(text, format).ok())
                .map(|date| date.with_time(Time::MIDNIGHT))
        })
}

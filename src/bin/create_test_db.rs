use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

use finance_insights::{
    CategoryName, Transaction, create_category, create_transaction, initialize_db,
};

/// A utility for creating a test database for the finance_insights web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of history to generate before the current month.
    #[arg(long, default_value_t = 6)]
    months: u32,
}

/// A recurring transaction: (category, description, amount, day of month).
type Template = (&'static str, &'static str, f64, u8);

const MONTHLY_TRANSACTIONS: [Template; 7] = [
    ("Salário", "Salário mensal", 5200.0, 5),
    ("Moradia", "Aluguel", -1500.0, 10),
    ("Mercado", "Supermercado", -620.0, 8),
    ("Mercado", "Feira", -95.0, 20),
    ("Transporte", "Combustível", -280.0, 12),
    ("Lazer", "Cinema", -60.0, 15),
    ("Lazer", "Restaurante", -140.0, 22),
];

/// Extra spending in the current month so the dashboard shows insights.
const CURRENT_MONTH_TRANSACTIONS: [Template; 4] = [
    ("Salário", "Salário mensal", 5200.0, 1),
    ("Lazer", "Show", -450.0, 1),
    ("Mercado", "Supermercado", -300.0, 1),
    ("Moradia", "Aluguel", -1500.0, 1),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories...");
    let mut names = MONTHLY_TRANSACTIONS
        .iter()
        .map(|(category, ..)| *category)
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();

    let categories = names
        .into_iter()
        .map(|name| create_category(CategoryName::new(name)?, &conn))
        .collect::<Result<Vec<_>, _>>()?;

    let category_id = |name: &str| {
        categories
            .iter()
            .find(|category| category.name.as_ref() == name)
            .map(|category| category.id)
            .ok_or_else(|| format!("missing category {name}"))
    };

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for months_ago in (1..=args.months).rev() {
        let (year, month) = months_before(today, months_ago);

        for (category, description, amount, day) in MONTHLY_TRANSACTIONS {
            let date = Date::from_calendar_date(year, month, day)?;
            let transaction = Transaction::build(
                amount,
                PrimitiveDateTime::new(date, Time::MIDNIGHT),
                category_id(category)?,
            )
            .description(Some(description.to_owned()));

            create_transaction(transaction, &conn)?;
            count += 1;
        }
    }

    for (category, description, amount, day) in CURRENT_MONTH_TRANSACTIONS {
        let date = today.replace_day(day)?;
        let transaction = Transaction::build(
            amount,
            PrimitiveDateTime::new(date, Time::MIDNIGHT),
            category_id(category)?,
        )
        .description(Some(description.to_owned()));

        create_transaction(transaction, &conn)?;
        count += 1;
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// The year and month `months` calendar months before `date`.
fn months_before(date: Date, months: u32) -> (i32, Month) {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    (year, month)
}

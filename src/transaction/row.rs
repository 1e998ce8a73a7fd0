//! The denormalized transaction rows consumed by the analytics.

use rusqlite::Connection;
use time::PrimitiveDateTime;

use crate::Error;

/// A transaction joined with the name of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    /// When the transaction happened, in local time.
    pub date: PrimitiveDateTime,
    /// Positive for income, negative for expenses.
    pub amount: f64,
    /// Optional text describing the transaction.
    pub description: Option<String>,
    /// The name of the transaction's category.
    pub category_name: String,
}

/// Get every transaction joined with its category name, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transaction_rows(connection: &Connection) -> Result<Vec<TransactionRow>, Error> {
    connection
        .prepare(
            "SELECT t.date, t.amount, t.description, c.name
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             ORDER BY t.date ASC, t.id ASC",
        )?
        .query_map([], |row| {
            Ok(TransactionRow {
                date: row.get(0)?,
                amount: row.get(1)?,
                description: row.get(2)?,
                category_name: row.get(3)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        category::{CategoryName, create_category},
        db::initialize,
        transaction::{Transaction, TransactionRow, create_transaction, get_transaction_rows},
    };

    #[test]
    fn joins_category_names_in_date_order() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let salary = create_category(CategoryName::new_unchecked("Salário"), &conn).unwrap();
        let food = create_category(CategoryName::new_unchecked("Alimentação"), &conn).unwrap();
        create_transaction(
            Transaction::build(-50.0, datetime!(2024-02-01 0:00), food.id)
                .description(Some("Mercado".to_owned())),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(1000.0, datetime!(2024-01-05 0:00), salary.id),
            &conn,
        )
        .unwrap();

        let rows = get_transaction_rows(&conn).unwrap();

        assert_eq!(
            rows,
            vec![
                TransactionRow {
                    date: datetime!(2024-01-05 0:00),
                    amount: 1000.0,
                    description: None,
                    category_name: "Salário".to_owned(),
                },
                TransactionRow {
                    date: datetime!(2024-02-01 0:00),
                    amount: -50.0,
                    description: Some("Mercado".to_owned()),
                    category_name: "Alimentação".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn empty_database_has_no_rows() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        assert_eq!(get_transaction_rows(&conn), Ok(Vec::new()));
    }
}

//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    Error,
    category::CategoryId,
    database_id::{DatabaseId, TransactionId},
};

/// The number of transactions returned by [get_transactions] when no limit is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

// ============================================================================
// MODELS
// ============================================================================

/// An income or expense recorded by the user.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// When the transaction happened, in the server's local time.
    pub date: PrimitiveDateTime,
    /// The amount of money earned (positive) or spent (negative).
    pub amount: f64,
    /// An optional text description of what the transaction was for.
    pub description: Option<String>,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        date: PrimitiveDateTime,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: None,
            category_id,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// use crate::transaction::Transaction;
///
/// let builder = Transaction::build(-45.99, datetime!(2025-01-15 0:00), category.id)
///     .description(Some("Padaria".to_owned()));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses
    /// and zero belongs to neither.
    pub amount: f64,

    /// When the transaction occurred, in local time.
    ///
    /// Manually entered transactions are dated at midnight.
    pub date: PrimitiveDateTime,

    /// A human-readable description of the transaction.
    pub description: Option<String>,

    /// The category of the transaction, e.g. "Alimentação", "Salário".
    ///
    /// Must refer to an existing category.
    pub category_id: CategoryId,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// Pagination and filtering options for [get_transactions].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TransactionQuery {
    /// The number of transactions to skip.
    #[serde(default)]
    pub skip: u32,
    /// The maximum number of transactions to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Only return transactions in this category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
            category_id: None,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, amount, description, category_id)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, amount, description, category_id",
        )?
        .query_row(
            (
                builder.date,
                builder.amount,
                builder.description,
                builder.category_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, amount, description, category_id FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get a page of transactions ordered by ID, optionally filtered by category.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions(
    query: TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, description, category_id FROM \"transaction\"
             WHERE ?1 IS NULL OR category_id = ?1
             ORDER BY id ASC
             LIMIT ?2 OFFSET ?3",
        )?
        .query_map(
            (query.category_id, query.limit, query.skip),
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// The category table must be created first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            description TEXT,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )
}

/// Map a database row to a Transaction.
///
/// Expects the columns `id, date, amount, description, category_id` in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let category_id = row.get(4)?;

    Ok(Transaction {
        id,
        date,
        amount,
        description,
        category_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        category::{Category, CategoryName, create_category},
        db::initialize,
        transaction::{
            Transaction, TransactionQuery, count_transactions, create_transaction,
            get_transaction, get_transactions,
        },
    };

    fn get_test_connection() -> (Connection, Category) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let category = create_category(CategoryName::new_unchecked("Mercado"), &conn).unwrap();

        (conn, category)
    }

    #[test]
    fn create_succeeds() {
        let (conn, category) = get_test_connection();
        let date = datetime!(2025-10-05 0:00);

        let transaction = create_transaction(
            Transaction::build(-12.3, date, category.id).description(Some("Feira".to_owned())),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.amount, -12.3);
        assert_eq!(transaction.date, date);
        assert_eq!(transaction.description.as_deref(), Some("Feira"));
        assert_eq!(transaction.category_id, category.id);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_keeps_time_of_day() {
        let (conn, category) = get_test_connection();
        let date = datetime!(2025-10-05 14:35:10);

        let transaction =
            create_transaction(Transaction::build(5.0, date, category.id), &conn).unwrap();

        assert_eq!(get_transaction(transaction.id, &conn).unwrap().date, date);
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let (conn, category) = get_test_connection();
        let category_id = category.id + 41;

        let result = create_transaction(
            Transaction::build(123.45, datetime!(2025-10-04 0:00), category_id),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(category_id)));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn get_transaction_fails_on_unknown_id() {
        let (conn, _) = get_test_connection();

        assert_eq!(get_transaction(1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_count() {
        let (conn, category) = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(i as f64, datetime!(2025-10-05 0:00), category.id),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }

    #[test]
    fn get_transactions_paginates_and_filters() {
        let (conn, food) = get_test_connection();
        let fun = create_category(CategoryName::new_unchecked("Lazer"), &conn).unwrap();
        let date = datetime!(2025-10-05 0:00);
        for i in 1..=6 {
            let category_id = if i % 2 == 0 { fun.id } else { food.id };
            create_transaction(Transaction::build(-(i as f64), date, category_id), &conn).unwrap();
        }

        let page = get_transactions(
            TransactionQuery {
                skip: 2,
                limit: 3,
                category_id: None,
            },
            &conn,
        )
        .unwrap();
        let fun_only = get_transactions(
            TransactionQuery {
                category_id: Some(fun.id),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(
            page.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        assert_eq!(
            fun_only.iter().map(|t| t.amount).collect::<Vec<_>>(),
            vec![-2.0, -4.0, -6.0]
        );
    }
}

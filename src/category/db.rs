//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if a category with the same name
/// already exists, or [Error::SqlError] for any other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1);", (name.as_ref(),))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Find a category by its exact name.
///
/// Returns `Ok(None)` if no category has that name.
pub fn get_category_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE name = ?1;")?
        .query_row((name.as_ref(),), map_row)
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Get the category called `name`, creating it if it does not exist yet.
///
/// The returned flag is `true` when a new category was created.
pub fn get_or_create_category(
    name: CategoryName,
    connection: &Connection,
) -> Result<(Category, bool), Error> {
    match get_category_by_name(&name, connection)? {
        Some(category) => Ok((category, false)),
        None => create_category(name, connection).map(|category| (category, true)),
    }
}

/// Count the stored transactions for each category.
///
/// Categories without transactions are absent from the map.
pub fn count_transactions_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM \"transaction\" GROUP BY category_id")?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        category::{
            CategoryName, count_transactions_per_category, create_category, get_all_categories,
            get_category, get_category_by_name, get_or_create_category,
        },
        db::initialize,
        transaction::{Transaction, create_transaction},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Mercado").unwrap();

        let category = create_category(name.clone(), &connection).expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Mercado");
        create_category(name.clone(), &connection).unwrap();

        let result = create_category(name, &connection);

        assert_eq!(
            result,
            Err(Error::DuplicateCategoryName("Mercado".to_owned()))
        );
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();
        let inserted = create_category(CategoryName::new_unchecked("Foo"), &connection).unwrap();

        assert_eq!(get_category(inserted.id, &connection), Ok(inserted.clone()));
        assert_eq!(
            get_category(inserted.id + 123, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_category_by_name_returns_none_for_unknown_name() {
        let connection = get_test_db_connection();
        let inserted = create_category(CategoryName::new_unchecked("Foo"), &connection).unwrap();

        assert_eq!(
            get_category_by_name(&CategoryName::new_unchecked("Foo"), &connection),
            Ok(Some(inserted))
        );
        assert_eq!(
            get_category_by_name(&CategoryName::new_unchecked("Bar"), &connection),
            Ok(None)
        );
    }

    #[test]
    fn get_all_categories_is_sorted_by_name() {
        let connection = get_test_db_connection();
        for name in ["Transporte", "Alimentação", "Lazer"] {
            create_category(CategoryName::new_unchecked(name), &connection).unwrap();
        }

        let names = get_all_categories(&connection)
            .unwrap()
            .into_iter()
            .map(|category| category.name.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, ["Alimentação", "Lazer", "Transporte"]);
    }

    #[test]
    fn get_or_create_category_only_creates_once() {
        let connection = get_test_db_connection();
        let name = CategoryName::new_unchecked("Lazer");

        let (first, created_first) = get_or_create_category(name.clone(), &connection).unwrap();
        let (second, created_second) = get_or_create_category(name, &connection).unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);
        assert_eq!(get_all_categories(&connection).unwrap().len(), 1);
    }

    #[test]
    fn counts_transactions_per_category() {
        let connection = get_test_db_connection();
        let food = create_category(CategoryName::new_unchecked("Alimentação"), &connection).unwrap();
        let fun = create_category(CategoryName::new_unchecked("Lazer"), &connection).unwrap();
        let empty = create_category(CategoryName::new_unchecked("Vazia"), &connection).unwrap();
        let date = datetime!(2025-03-10 00:00);

        for i in 0..3 {
            create_transaction(Transaction::build(-(i as f64), date, food.id), &connection)
                .unwrap();
        }
        for i in 0..5 {
            create_transaction(Transaction::build(-(i as f64), date, fun.id), &connection)
                .unwrap();
        }

        let counts = count_transactions_per_category(&connection).unwrap();

        assert_eq!(counts[&food.id], 3);
        assert_eq!(counts[&fun.id], 5);
        assert!(!counts.contains_key(&empty.id));
    }
}

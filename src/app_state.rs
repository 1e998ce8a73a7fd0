//! Implements a struct that holds the state of the web server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{Error, cache::TransactionCache, db::initialize, timezone::get_local_offset};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The transaction rows read by the dashboard, shared by every handler
    /// that writes transactions or categories.
    pub transaction_cache: Arc<TransactionCache>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Sao_Paulo".
    /// Cached transaction rows are reloaded after `cache_ttl`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] if `local_timezone` is not a
    /// known timezone, or an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        cache_ttl: Duration,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
            transaction_cache: Arc::new(TransactionCache::new(cache_ttl)),
        })
    }

    /// Close the database connection.
    ///
    /// # Errors
    /// Returns [Error::DatabaseCloseError] if another clone of the state still
    /// holds the connection or SQLite fails to close it, and
    /// [Error::DatabaseLockError] if the lock was poisoned.
    pub fn close(self) -> Result<(), Error> {
        let connection = Arc::try_unwrap(self.db_connection)
            .map_err(|_| {
                Error::DatabaseCloseError("the connection is still in use".to_owned())
            })?
            .into_inner()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .close()
            .map_err(|(_, error)| Error::DatabaseCloseError(error.to_string()))
    }
}

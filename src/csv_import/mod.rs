//! Importing transactions from CSV files.

mod csv;
mod import_endpoint;

pub use import_endpoint::import_transactions;

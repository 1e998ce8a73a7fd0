//! Transactions: the incomes and expenses recorded by the user.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and querying transactions
//! - The denormalized `TransactionRow` read used by the analytics
//! - Handlers for creating and listing transactions

mod core;
mod create_endpoint;
mod form;
mod list_endpoint;
mod row;

pub use core::{
    Transaction, TransactionBuilder, TransactionQuery, count_transactions, create_transaction,
    create_transaction_table, get_transaction, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use form::{TransactionFormDefaults, transaction_form_fields};
pub use list_endpoint::list_transactions_endpoint;
pub use row::{TransactionRow, get_transaction_rows};

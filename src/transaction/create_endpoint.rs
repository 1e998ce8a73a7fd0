//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, PrimitiveDateTime, Time};

use crate::{
    AppState, Error,
    cache::TransactionCache,
    category::CategoryId,
    endpoints,
    transaction::{Transaction, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Cleared after the transaction is saved.
    pub transaction_cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transaction_cache: state.transaction_cache.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The signed value of the transaction in reais.
    pub amount: f64,
    /// The day the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if !form.amount.is_finite() {
        tracing::error!("rejected transaction with non-finite amount {}", form.amount);
        return Error::InvalidAmount(form.amount).into_alert_response();
    }

    let description = form
        .description
        .map(|description| description.trim().to_owned())
        .filter(|description| !description.is_empty());
    let date = PrimitiveDateTime::new(form.date, Time::MIDNIGHT);
    let transaction = Transaction::build(form.amount, date, form.category_id).description(description);

    let result = match state.db_connection.lock() {
        Ok(connection) => create_transaction(transaction, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match result {
        Ok(transaction) => {
            tracing::debug!("created transaction {}", transaction.id);
            state.transaction_cache.invalidate();

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

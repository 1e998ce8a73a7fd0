//! The endpoint that imports transactions from uploaded CSV files.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    cache::TransactionCache,
    category::get_or_create_category,
    csv_import::csv::{ImportRow, parse_csv},
    html::format_count,
    transaction::{Transaction, create_transaction},
};

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Invalidated once the import has been committed.
    pub transaction_cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transaction_cache: state.transaction_cache.clone(),
        }
    }
}

/// The number of rows written by an import.
#[derive(Debug, Default, PartialEq, Eq)]
struct ImportSummary {
    transactions: usize,
    new_categories: usize,
}

/// Route handler for importing transactions from one or more CSV files.
///
/// Every file is parsed before anything is written, and the rows of all files
/// are stored in a single database transaction.
pub async fn import_transactions(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    let start_time = std::time::Instant::now();
    let mut rows = Vec::new();
    let mut file_count = 0;

    loop {
        let field = multipart.next_field().await.map_err(|error| {
            tracing::error!("Could not read multipart form: {error}");
            Error::MultipartError(error.body_text()).into_alert_response()
        })?;

        let Some(field) = field else {
            break;
        };

        let csv_data = parse_multipart_field(field)
            .await
            .map_err(Error::into_alert_response)?;
        file_count += 1;

        rows.extend(
            parse_csv(&csv_data)
                .inspect_err(|error| tracing::debug!("Failed to parse CSV: {error}"))
                .map_err(Error::into_alert_response)?,
        );
    }

    if file_count == 0 {
        tracing::error!("Received an import request without any files");
        return Err(
            Error::MultipartError("Nenhum arquivo foi enviado.".to_owned()).into_alert_response(),
        );
    }

    let summary = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError.into_alert_response()
        })?;

        import_rows(rows, &connection)
            .inspect_err(|error| tracing::error!("Failed to import transactions: {error}"))
            .map_err(Error::into_alert_response)?
    };

    state.transaction_cache.invalidate();

    tracing::info!(
        "Imported {} transactions and {} new categories in {}ms",
        summary.transactions,
        summary.new_categories,
        start_time.elapsed().as_millis()
    );

    let alert = Alert::Success {
        message: format!(
            "Sucesso! {} transações importadas.",
            format_count(summary.transactions)
        ),
        details: format!(
            "{} novas categorias criadas.",
            format_count(summary.new_categories)
        ),
    };

    Ok((StatusCode::CREATED, alert.into_html()).into_response())
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };

    let is_csv = field.content_type() == Some("text/csv")
        || file_name.to_lowercase().ends_with(".csv");

    if !is_csv {
        return Err(Error::NotCSV);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

/// Store `rows`, creating any category that does not exist yet.
///
/// Either every row is stored or none are.
fn import_rows(rows: Vec<ImportRow>, connection: &Connection) -> Result<ImportSummary, Error> {
    let tx = connection.unchecked_transaction()?;
    let mut summary = ImportSummary::default();

    for row in rows {
        let (category, created) = get_or_create_category(row.category, &tx)?;

        if created {
            summary.new_categories += 1;
        }

        create_transaction(
            Transaction::build(row.amount, row.date, category.id).description(row.description),
            &tx,
        )?;
        summary.transactions += 1;
    }

    tx.commit()?;

    Ok(summary)
}

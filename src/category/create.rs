//! Category creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    cache::TransactionCache,
    category::{CategoryName, create_category},
    endpoints,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub transaction_cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transaction_cache: state.transaction_cache.clone(),
        }
    }
}

/// The page to show once a category has been created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnTo {
    #[default]
    Dashboard,
    Categories,
}

impl ReturnTo {
    fn endpoint(self) -> &'static str {
        match self {
            ReturnTo::Dashboard => endpoints::DASHBOARD_VIEW,
            ReturnTo::Categories => endpoints::CATEGORIES_VIEW,
        }
    }
}

/// The form data for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryForm {
    pub name: String,
    #[serde(default)]
    pub return_to: ReturnTo,
}

/// Handle category creation form submission.
///
/// Responds with an HTMX redirect on success and an inline alert otherwise.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Form(form): Form<CreateCategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_category(name, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match result {
        Ok(category) => {
            tracing::debug!("created category {} ({})", category.name, category.id);
            state.transaction_cache.invalidate();

            (
                HxRedirect(form.return_to.endpoint().to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create category: {error}");
            error.into_alert_response()
        }
    }
}

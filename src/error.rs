//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, category::CategoryId, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The category ID used to create a transaction did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// A transaction amount was infinite or not a number.
    #[error("the amount {0} is not a finite number")]
    InvalidAmount(f64),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category with the same name already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The multipart form could not be parsed as a list of CSV files.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV header is missing one or more of the required columns.
    #[error("the CSV must have the columns: {}", .0.join(", "))]
    MissingCSVColumns(Vec<String>),

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The database connection could not be closed cleanly.
    ///
    /// Also returned when other handles to the connection are still alive.
    #[error("could not close the database connection: {0}")]
    DatabaseCloseError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Configuração de fuso horário inválida",
                fix: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor e use um nome de fuso horário canônico."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Configuração de fuso horário inválida".to_owned(),
                    details: format!(
                        "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                        configurações do servidor."
                    ),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Categoria inválida".to_owned(),
                    details: format!("Nenhuma categoria encontrada com o ID {category_id}."),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Valor inválido".to_owned(),
                    details: format!("O valor \"{amount}\" não é um número válido."),
                },
            ),
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "O nome da categoria não pode ser vazio.".to_owned(),
                },
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Categoria duplicada".to_owned(),
                    details: format!("A categoria \"{name}\" já existe."),
                },
            ),
            Error::NotCSV => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "O arquivo precisa ser um CSV.".to_owned(),
                },
            ),
            Error::MissingCSVColumns(columns) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Colunas ausentes no CSV".to_owned(),
                    details: format!("O CSV precisa ter as colunas: {}", columns.join(", ")),
                },
            ),
            Error::InvalidCSV(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Erro ao processar o CSV".to_owned(),
                    details: format!("Verifique o formato do arquivo. Erro: {reason}"),
                },
            ),
            Error::MultipartError(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Erro ao receber o arquivo".to_owned(),
                    details: reason,
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Algo deu errado".to_owned(),
                    details: "Ocorreu um erro inesperado. Verifique a conexão com o banco de \
                        dados e os logs do servidor."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::Error;

    #[test]
    fn maps_no_rows_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn missing_columns_message_lists_columns() {
        let error = Error::MissingCSVColumns(vec!["Date".to_owned(), "Amount".to_owned()]);

        assert_eq!(error.to_string(), "the CSV must have the columns: Date, Amount");
    }

    #[test]
    fn user_errors_render_as_bad_request_alerts() {
        let cases = [
            Error::EmptyCategoryName,
            Error::InvalidCategory(42),
            Error::InvalidAmount(f64::INFINITY),
            Error::NotCSV,
            Error::InvalidCSV("bad row".to_owned()),
        ];

        for error in cases {
            let response = error.into_alert_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unexpected_errors_render_as_server_error_alerts() {
        let response = Error::DatabaseLockError.into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

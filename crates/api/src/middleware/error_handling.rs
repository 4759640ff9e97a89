//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Agenda API.
//! It maps domain errors to HTTP status codes and `{ "error": message }` JSON
//! bodies.
//!
//! | Error | Status |
//! |-------|--------|
//! | `Validation` | 400 |
//! | `Authentication`, `Authorization`, `BusinessRule` | 401 |
//! | `NotFound` | 404 |
//! | `Database`, `Internal` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use agenda_core::errors::AgendaError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use agenda_api::middleware::error_handling::AppError;
/// use agenda_core::errors::AgendaError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id < 1 {
///         return Err(AppError(AgendaError::NotFound(format!("Appointment with ID {} not found", id))));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub AgendaError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AgendaError::NotFound(_) => StatusCode::NOT_FOUND,
            AgendaError::Validation(_) => StatusCode::BAD_REQUEST,
            AgendaError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AgendaError::Authorization(_) => StatusCode::UNAUTHORIZED,
            AgendaError::BusinessRule(_) => StatusCode::UNAUTHORIZED,
            AgendaError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AgendaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from AgendaError to AppError
impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Wraps the report in an `AgendaError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AgendaError::Database(err))
    }
}

/// Maps an AgendaError to an HTTP response
pub fn map_error(err: AgendaError) -> Response {
    AppError(err).into_response()
}

//! # Request Extractors
//!
//! Wrappers over axum's `Json`, `Query` and `Path` whose rejections go through
//! [`AppError`], so a malformed request gets the same `400 { "error": ... }`
//! response as a body that fails validation.

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};
use agenda_core::errors::{AgendaError, VALIDATION_FAILED};

use crate::middleware::error_handling::AppError;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

fn rejected(kind: &str, reason: String) -> AppError {
    tracing::debug!("Rejected {}: {}", kind, reason);
    AppError(AgendaError::Validation(VALIDATION_FAILED.to_string()))
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejected("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        rejected("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        rejected("path", rejection.body_text())
    }
}

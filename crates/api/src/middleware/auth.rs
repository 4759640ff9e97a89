//! # Caller Identity
//!
//! Authentication happens upstream of this service. The auth layer forwards the
//! id of the signed-in user in a header (by default `x-user-id`) and this module
//! trusts it as-is.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use agenda_core::errors::AgendaError;

use crate::{middleware::error_handling::AppError, ApiState};

/// The authenticated user making the request.
///
/// Rejects with 401 when the identity header is missing or not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(state.user_id_header.as_str())
            .ok_or_else(|| {
                AppError(AgendaError::Authentication("Missing caller identity".to_string()))
            })?;

        let user_id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                AppError(AgendaError::Authentication("Invalid caller identity".to_string()))
            })?;

        Ok(AuthUser(user_id))
    }
}

//! # Appointment Handlers
//!
//! HTTP adapters over [`AppointmentService`](agenda_core::services::AppointmentService).
//! Each handler resolves the caller, delegates to the service and serializes
//! the result; every rule lives in the service.

use axum::{extract::State, Json};
use std::sync::Arc;
use agenda_core::models::appointment::{
    AppointmentResponse, AppointmentSummary, CreateAppointmentRequest, ListAppointmentsQuery,
};

use crate::{
    middleware::{
        auth::AuthUser,
        error_handling::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
    ApiState,
};

/// Lists the caller's active appointments
///
/// # Endpoint
///
/// ```text
/// GET /appointments?page=2
/// ```
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    AuthUser(user_id): AuthUser,
    AppQuery(query): AppQuery<ListAppointmentsQuery>,
) -> Result<Json<Vec<AppointmentSummary>>, AppError> {
    let appointments = state.service.list(user_id, query.page).await?;
    Ok(Json(appointments))
}

/// Books an appointment with a provider
///
/// # Endpoint
///
/// ```text
/// POST /appointments
/// { "provider_id": 2, "date": "2030-05-21T10:00:00Z" }
/// ```
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.service.create(user_id, &payload).await?;
    Ok(Json(appointment))
}

/// Cancels one of the caller's appointments
///
/// # Endpoint
///
/// ```text
/// DELETE /appointments/:id
/// ```
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let appointment = state.service.cancel(user_id, id).await?;
    Ok(Json(appointment))
}

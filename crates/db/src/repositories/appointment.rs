use crate::models::{DbAppointment, DbAppointmentWithParties, DbAppointmentWithProvider};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    user_id: i64,
    provider_id: i64,
    date: DateTime<Utc>,
) -> Result<DbAppointment> {
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: user={}, provider={}, date={}",
        user_id, provider_id, date
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (user_id, provider_id, date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, user_id, provider_id, date, canceled_at, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(provider_id)
    .bind(date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_active_appointments_by_user(
    pool: &Pool<Postgres>,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<DbAppointmentWithProvider>> {
    let appointments = sqlx::query_as::<_, DbAppointmentWithProvider>(
        r#"
        SELECT a.id, a.user_id, a.provider_id, a.date, a.canceled_at, a.created_at, a.updated_at,
               p.name AS provider_name,
               f.id AS avatar_id, f.name AS avatar_name, f.path AS avatar_path
        FROM appointments a
        JOIN users p ON p.id = a.provider_id
        LEFT JOIN files f ON f.id = p.avatar_id
        WHERE a.user_id = $1 AND a.canceled_at IS NULL
        ORDER BY a.date ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn get_active_appointment_in_slot(
    pool: &Pool<Postgres>,
    provider_id: i64,
    date: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, user_id, provider_id, date, canceled_at, created_at, updated_at
        FROM appointments
        WHERE provider_id = $1 AND date = $2 AND canceled_at IS NULL
        "#,
    )
    .bind(provider_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointment_with_parties(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<Option<DbAppointmentWithParties>> {
    let appointment = sqlx::query_as::<_, DbAppointmentWithParties>(
        r#"
        SELECT a.id, a.user_id, a.provider_id, a.date, a.canceled_at, a.created_at, a.updated_at,
               p.name AS provider_name, p.email AS provider_email,
               u.name AS user_name
        FROM appointments a
        JOIN users p ON p.id = a.provider_id
        JOIN users u ON u.id = a.user_id
        WHERE a.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Cancels an active appointment. Yields `None` when it is missing or already canceled.
pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: i64,
    canceled_at: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET canceled_at = $2, updated_at = $2
        WHERE id = $1 AND canceled_at IS NULL
        RETURNING id, user_id, provider_id, date, canceled_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(canceled_at)
    .fetch_optional(pool)
    .await?;

    if appointment.is_none() {
        tracing::debug!("Appointment {} was not active, nothing canceled", id);
    }

    Ok(appointment)
}

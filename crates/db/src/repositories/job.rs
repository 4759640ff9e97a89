use crate::models::DbJob;
use chrono::{DateTime, Utc};
use eyre::Result;
use serde_json::Value;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn enqueue_job(pool: &Pool<Postgres>, key: &str, payload: Value) -> Result<DbJob> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let job = sqlx::query_as::<_, DbJob>(
        r#"
        INSERT INTO jobs (id, key, payload, status, attempts, run_at, created_at, updated_at)
        VALUES ($1, $2, $3, 'pending', 0, $4, $4, $4)
        RETURNING id, key, payload, status, attempts, last_error, run_at, created_at
        "#,
    )
    .bind(id)
    .bind(key)
    .bind(payload)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Job queued: id={}, key={}", job.id, job.key);
    Ok(job)
}

/// Claims the oldest due job and marks it running.
///
/// A job is due when it is pending with `run_at` in the past, or when it has
/// been running since before `stale_before` (its worker is presumed dead).
/// Concurrent workers skip rows another worker has locked, so each job is
/// handed to at most one of them.
pub async fn claim_next_job(
    pool: &Pool<Postgres>,
    stale_before: DateTime<Utc>,
) -> Result<Option<DbJob>> {
    let job = sqlx::query_as::<_, DbJob>(
        r#"
        UPDATE jobs
        SET status = 'running', attempts = attempts + 1, updated_at = NOW()
        WHERE id = (
            SELECT id
            FROM jobs
            WHERE (status = 'pending' AND run_at <= NOW())
               OR (status = 'running' AND updated_at < $1)
            ORDER BY run_at ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING id, key, payload, status, attempts, last_error, run_at, created_at
        "#,
    )
    .bind(stale_before)
    .fetch_optional(pool)
    .await?;

    Ok(job)
}

pub async fn complete_job(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET status = 'done', last_error = NULL, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Puts a failed job back in the queue to run again at `run_at`.
pub async fn retry_job(
    pool: &Pool<Postgres>,
    id: Uuid,
    error: &str,
    run_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET status = 'pending', last_error = $2, run_at = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(error)
    .bind(run_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fail_job(pool: &Pool<Postgres>, id: Uuid, error: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE jobs
        SET status = 'failed', last_error = $2, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(error)
    .execute(pool)
    .await?;

    Ok(())
}

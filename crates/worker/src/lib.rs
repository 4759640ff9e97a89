use std::time::Duration;

use agenda_core::models::job::Job;
use agenda_db::repositories::job as queue;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgPool;
use tracing::{error, info, warn};

pub mod config;
pub mod handlers;
pub mod mailer;

use config::WorkerConfig;
use mailer::Mailer;

/// What happens to a job whose handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Run again at the given time
    Retry(DateTime<Utc>),
    /// Give up and mark the job failed
    Fail,
}

/// Decides the fate of a job that failed on its `attempts`-th try.
pub fn after_failure(config: &WorkerConfig, attempts: i32, now: DateTime<Utc>) -> FailureAction {
    if attempts < config.max_attempts {
        FailureAction::Retry(now + config.retry_delay(attempts))
    } else {
        FailureAction::Fail
    }
}

/// Whether a claimed job has used up its attempts before running, which
/// happens when it keeps getting reclaimed after its lease expires.
pub fn exhausted(config: &WorkerConfig, attempts: i32) -> bool {
    attempts > config.max_attempts
}

/// Start the job worker with the provided configuration and database connection.
///
/// Polls the `jobs` table for due work and runs each job through its handler.
/// Returns once Ctrl-C is received; a job already in flight finishes first.
pub async fn start_worker(
    config: WorkerConfig,
    db_pool: PgPool,
    mailer: impl Mailer + 'static,
) -> Result<()> {
    info!(
        "Starting job worker (poll every {}ms, max {} attempts)",
        config.poll_interval_ms, config.max_attempts
    );

    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let idle = match process_next_job(&db_pool, &mailer, &config).await {
            Ok(processed) => !processed,
            Err(e) => {
                error!("Job queue error: {:?}", e);
                true
            }
        };

        let pause = if idle { poll_interval } else { Duration::ZERO };

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping job worker");
                break;
            }
            _ = tokio::time::sleep(pause) => {}
        }
    }

    Ok(())
}

/// Claims and runs a single due job.
///
/// Returns `Ok(false)` when nothing was due.
pub async fn process_next_job<M: Mailer + ?Sized>(
    db_pool: &PgPool,
    mailer: &M,
    config: &WorkerConfig,
) -> Result<bool> {
    let Some(row) = queue::claim_next_job(db_pool, config.stale_before(Utc::now())).await? else {
        return Ok(false);
    };

    let id = row.id;
    let attempts = row.attempts;

    if exhausted(config, attempts) {
        error!(
            "Job {} ({}) was abandoned mid-run too often, marking failed",
            id, row.key
        );
        let reason = row
            .last_error
            .unwrap_or_else(|| "Worker lease expired".to_string());
        queue::fail_job(db_pool, id, &reason).await?;
        return Ok(true);
    }

    let job = match Job::try_from(row) {
        Ok(job) => job,
        Err(e) => {
            error!("Job {} cannot be decoded, marking failed: {}", id, e);
            queue::fail_job(db_pool, id, &e.to_string()).await?;
            return Ok(true);
        }
    };

    match handlers::run(&job, mailer).await {
        Ok(()) => {
            queue::complete_job(db_pool, id).await?;
            info!("Job {} ({}) done after {} attempt(s)", id, job.key, attempts);
        }
        Err(e) => match after_failure(config, attempts, Utc::now()) {
            FailureAction::Retry(run_at) => {
                warn!(
                    "Job {} ({}) failed on attempt {}, retrying at {}: {:?}",
                    id, job.key, attempts, run_at, e
                );
                queue::retry_job(db_pool, id, &format!("{:#}", e), run_at).await?;
            }
            FailureAction::Fail => {
                error!(
                    "Job {} ({}) failed after {} attempts: {:?}",
                    id, job.key, attempts, e
                );
                queue::fail_job(db_pool, id, &format!("{:#}", e)).await?;
            }
        },
    }

    Ok(true)
}

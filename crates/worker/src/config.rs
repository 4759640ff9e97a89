use agenda_core::logging::parse_log_level;
use eyre::{eyre, Result};
use std::env;
use tracing::Level;

/// Configuration for the job worker.
///
/// Loaded from the environment the same way the API loads its own settings.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Database connection URL (required)
    pub database_url: String,
    /// Log level (defaults to INFO)
    pub log_level: Level,
    /// Pause between polls when the queue is empty, in milliseconds
    pub poll_interval_ms: u64,
    /// Attempts after which a failing job is marked failed
    pub max_attempts: i32,
    /// Base delay before a failed job runs again, in seconds
    pub retry_delay_seconds: i64,
    /// How long a running job may go without finishing before another worker
    /// picks it up again, in seconds
    pub lease_seconds: i64,
    /// Sender address for outgoing mail
    pub mail_from: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| eyre!("DATABASE_URL environment variable not set"))?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let poll_interval_ms = env::var("JOB_POLL_INTERVAL_MS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| eyre!("JOB_POLL_INTERVAL_MS must be a whole number of milliseconds"))?
            .unwrap_or(1000);

        let max_attempts = env::var("JOB_MAX_ATTEMPTS")
            .ok()
            .map(|v| v.parse::<i32>())
            .transpose()
            .map_err(|_| eyre!("JOB_MAX_ATTEMPTS must be a valid integer"))?
            .unwrap_or(3);

        let retry_delay_seconds = env::var("JOB_RETRY_DELAY_SECONDS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .map_err(|_| eyre!("JOB_RETRY_DELAY_SECONDS must be a whole number of seconds"))?
            .unwrap_or(30);

        let lease_seconds = env::var("JOB_LEASE_SECONDS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .map_err(|_| eyre!("JOB_LEASE_SECONDS must be a whole number of seconds"))?
            .unwrap_or(300);

        let mail_from = env::var("MAIL_FROM")
            .unwrap_or_else(|_| "Agenda <noreply@agenda.local>".to_string());

        Ok(Self {
            database_url,
            log_level,
            poll_interval_ms,
            max_attempts: max_attempts.max(1),
            retry_delay_seconds,
            lease_seconds,
            mail_from,
        })
    }

    /// Delay before the next run of a job that failed on its `attempts`-th try.
    ///
    /// Grows linearly with the number of attempts.
    pub fn retry_delay(&self, attempts: i32) -> chrono::Duration {
        chrono::Duration::seconds(self.retry_delay_seconds * i64::from(attempts.max(1)))
    }

    /// Running jobs last touched before this instant are considered abandoned.
    pub fn stale_before(&self, now: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
        now - chrono::Duration::seconds(self.lease_seconds)
    }
}

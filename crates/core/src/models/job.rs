use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    appointment::AppointmentWithParties,
    user::{ProviderContact, UserContact},
};

/// Names of the jobs the worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKey {
    CancellationMail,
}

impl JobKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKey::CancellationMail => "CancellationMail",
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKey {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CancellationMail" => Ok(JobKey::CancellationMail),
            other => Err(eyre::eyre!("Unknown job key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "failed" => Ok(JobStatus::Failed),
            other => Err(eyre::eyre!("Unknown job status: {}", other)),
        }
    }
}

/// A queued unit of deferred work as claimed by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub key: JobKey,
    pub payload: Value,
    pub status: JobStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a canceled appointment handed to the cancellation mail job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationMailPayload {
    pub appointment: CanceledAppointment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanceledAppointment {
    pub id: i64,
    pub user_id: i64,
    pub provider_id: i64,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub provider: ProviderContact,
    pub user: UserContact,
}

impl From<AppointmentWithParties> for CancellationMailPayload {
    fn from(record: AppointmentWithParties) -> Self {
        let AppointmentWithParties {
            appointment,
            provider,
            user,
        } = record;

        Self {
            appointment: CanceledAppointment {
                id: appointment.id,
                user_id: appointment.user_id,
                provider_id: appointment.provider_id,
                date: appointment.date,
                canceled_at: appointment.canceled_at,
                provider,
                user,
            },
        }
    }
}

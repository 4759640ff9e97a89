//! Contracts for the collaborators the appointment service talks to.
//!
//! `agenda-db` implements all of them on top of PostgreSQL and
//! [`crate::memory::InMemoryStore`] implements them in process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    errors::AgendaResult,
    models::{
        appointment::{
            Appointment, AppointmentWithParties, AppointmentWithProvider, NewAppointment,
            Pagination,
        },
        job::JobKey,
        notification::{NewNotification, Notification},
        user::User,
    },
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user that has the provider flag set.
    async fn find_provider(&self, id: i64) -> AgendaResult<Option<User>>;

    async fn find_user(&self, id: i64) -> AgendaResult<Option<User>>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Active appointments owned by `user_id`, oldest date first, one page at a time.
    async fn list_active_by_user(
        &self,
        user_id: i64,
        page: Pagination,
    ) -> AgendaResult<Vec<AppointmentWithProvider>>;

    /// The active appointment occupying the provider's slot at `date`, if any.
    async fn find_active_in_slot(
        &self,
        provider_id: i64,
        date: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>>;

    /// Inserts an active appointment. A taken slot is reported as a validation error.
    async fn insert(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;

    async fn find_with_parties(&self, id: i64) -> AgendaResult<Option<AppointmentWithParties>>;

    /// Sets `canceled_at` on an active appointment. Returns `None` when the
    /// appointment was already canceled.
    async fn mark_canceled(
        &self,
        id: i64,
        canceled_at: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>>;
}

#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn create(&self, notification: NewNotification) -> AgendaResult<Notification>;
}

#[async_trait]
pub trait JobDispatcher: Send + Sync {
    /// Hands a job over for asynchronous processing. Resolves once the job is
    /// accepted, not once it has run.
    async fn enqueue(&self, key: JobKey, payload: Value) -> AgendaResult<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

//! PostgreSQL implementation of the collaborator traits from `agenda-core`.
//!
//! `PgStore` is a thin adapter: every method calls one repository function and
//! converts the `Db*` row into its domain model.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use agenda_core::{
    errors::{AgendaError, AgendaResult, SLOT_UNAVAILABLE},
    models::{
        appointment::{
            Appointment, AppointmentWithParties, AppointmentWithProvider, NewAppointment,
            Pagination,
        },
        job::{Job, JobKey},
        notification::{NewNotification, Notification},
        user::{File, ProviderContact, ProviderProfile, User, UserContact},
    },
    traits::{AppointmentStore, JobDispatcher, NotificationEmitter, UserStore},
};

use crate::{
    models::{
        DbAppointment, DbAppointmentWithParties, DbAppointmentWithProvider, DbJob,
        DbNotification, DbUser,
    },
    repositories, DbPool,
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// True when `err` is PostgreSQL rejecting a duplicate key.
pub fn is_unique_violation(err: &eyre::Report) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_provider(&self, id: i64) -> AgendaResult<Option<User>> {
        let provider = repositories::user::get_provider_by_id(&self.pool, id).await?;
        Ok(provider.map(User::from))
    }

    async fn find_user(&self, id: i64) -> AgendaResult<Option<User>> {
        let user = repositories::user::get_user_by_id(&self.pool, id).await?;
        Ok(user.map(User::from))
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn list_active_by_user(
        &self,
        user_id: i64,
        page: Pagination,
    ) -> AgendaResult<Vec<AppointmentWithProvider>> {
        let rows = repositories::appointment::get_active_appointments_by_user(
            &self.pool,
            user_id,
            page.limit(),
            page.offset(),
        )
        .await?;

        Ok(rows.into_iter().map(AppointmentWithProvider::from).collect())
    }

    async fn find_active_in_slot(
        &self,
        provider_id: i64,
        date: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>> {
        let appointment =
            repositories::appointment::get_active_appointment_in_slot(&self.pool, provider_id, date)
                .await?;
        Ok(appointment.map(Appointment::from))
    }

    async fn insert(&self, new: NewAppointment) -> AgendaResult<Appointment> {
        match repositories::appointment::create_appointment(
            &self.pool,
            new.user_id,
            new.provider_id,
            new.date,
        )
        .await
        {
            Ok(appointment) => Ok(appointment.into()),
            Err(err) if is_unique_violation(&err) => {
                tracing::debug!(
                    "Slot taken concurrently: provider={}, date={}",
                    new.provider_id, new.date
                );
                Err(AgendaError::Validation(SLOT_UNAVAILABLE.to_string()))
            }
            Err(err) => Err(AgendaError::Database(err)),
        }
    }

    async fn find_with_parties(&self, id: i64) -> AgendaResult<Option<AppointmentWithParties>> {
        let row = repositories::appointment::get_appointment_with_parties(&self.pool, id).await?;
        Ok(row.map(AppointmentWithParties::from))
    }

    async fn mark_canceled(
        &self,
        id: i64,
        canceled_at: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>> {
        let appointment =
            repositories::appointment::cancel_appointment(&self.pool, id, canceled_at).await?;
        Ok(appointment.map(Appointment::from))
    }
}

#[async_trait]
impl NotificationEmitter for PgStore {
    async fn create(&self, new: NewNotification) -> AgendaResult<Notification> {
        let notification =
            repositories::notification::create_notification(&self.pool, &new.content, new.user_id)
                .await?;
        Ok(notification.into())
    }
}

#[async_trait]
impl JobDispatcher for PgStore {
    async fn enqueue(&self, key: JobKey, payload: Value) -> AgendaResult<()> {
        repositories::job::enqueue_job(&self.pool, key.as_str(), payload).await?;
        Ok(())
    }
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            provider: row.provider,
            avatar_id: row.avatar_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            provider_id: row.provider_id,
            date: row.date,
            canceled_at: row.canceled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbAppointmentWithProvider> for AppointmentWithProvider {
    fn from(row: DbAppointmentWithProvider) -> Self {
        // The avatar columns come from a LEFT JOIN and are all set or all NULL.
        let avatar = match (row.avatar_id, row.avatar_name, row.avatar_path) {
            (Some(id), Some(name), Some(path)) => Some(File { id, name, path }),
            _ => None,
        };

        Self {
            appointment: Appointment {
                id: row.id,
                user_id: row.user_id,
                provider_id: row.provider_id,
                date: row.date,
                canceled_at: row.canceled_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            provider: ProviderProfile {
                id: row.provider_id,
                name: row.provider_name,
                avatar,
            },
        }
    }
}

impl From<DbAppointmentWithParties> for AppointmentWithParties {
    fn from(row: DbAppointmentWithParties) -> Self {
        Self {
            appointment: Appointment {
                id: row.id,
                user_id: row.user_id,
                provider_id: row.provider_id,
                date: row.date,
                canceled_at: row.canceled_at,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            provider: ProviderContact {
                name: row.provider_name,
                email: row.provider_email,
            },
            user: UserContact {
                name: row.user_name,
            },
        }
    }
}

impl From<DbNotification> for Notification {
    fn from(row: DbNotification) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user_id: row.user_id,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbJob> for Job {
    type Error = eyre::Report;

    fn try_from(row: DbJob) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            key: row.key.parse()?,
            payload: row.payload,
            status: row.status.parse()?,
            attempts: row.attempts,
            last_error: row.last_error,
            run_at: row.run_at,
            created_at: row.created_at,
        })
    }
}

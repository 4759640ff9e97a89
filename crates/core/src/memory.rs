//! In-process implementation of every collaborator trait.
//!
//! Backs local experiments and the service tests. It mirrors the relational
//! behavior of the PostgreSQL store, including inner-join semantics and the
//! one-active-appointment-per-slot constraint.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    errors::{AgendaError, AgendaResult, SLOT_UNAVAILABLE},
    models::{
        appointment::{
            Appointment, AppointmentWithParties, AppointmentWithProvider, NewAppointment,
            Pagination,
        },
        job::JobKey,
        notification::{NewNotification, Notification},
        user::{File, ProviderContact, ProviderProfile, User, UserContact},
    },
    traits::{AppointmentStore, JobDispatcher, NotificationEmitter, UserStore},
};

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    files: BTreeMap<i64, File>,
    appointments: BTreeMap<i64, Appointment>,
    notifications: Vec<Notification>,
    jobs: Vec<(JobKey, Value)>,
    last_appointment_id: i64,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_user(&self, user: User) {
        self.state().users.insert(user.id, user);
    }

    pub fn add_file(&self, file: File) {
        self.state().files.insert(file.id, file);
    }

    /// Stores an appointment as-is, bypassing every booking rule.
    pub fn seed_appointment(&self, appointment: Appointment) {
        let mut state = self.state();
        state.last_appointment_id = state.last_appointment_id.max(appointment.id);
        state.appointments.insert(appointment.id, appointment);
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.state().appointments.values().cloned().collect()
    }

    pub fn appointment(&self, id: i64) -> Option<Appointment> {
        self.state().appointments.get(&id).cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    pub fn enqueued_jobs(&self) -> Vec<(JobKey, Value)> {
        self.state().jobs.clone()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_provider(&self, id: i64) -> AgendaResult<Option<User>> {
        Ok(self.state().users.get(&id).filter(|u| u.provider).cloned())
    }

    async fn find_user(&self, id: i64) -> AgendaResult<Option<User>> {
        Ok(self.state().users.get(&id).cloned())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn list_active_by_user(
        &self,
        user_id: i64,
        page: Pagination,
    ) -> AgendaResult<Vec<AppointmentWithProvider>> {
        let state = self.state();

        let mut owned: Vec<&Appointment> = state
            .appointments
            .values()
            .filter(|a| a.user_id == user_id && a.is_active())
            .collect();
        owned.sort_by_key(|a| a.date);

        let rows = owned
            .into_iter()
            .filter_map(|appointment| {
                let provider = state.users.get(&appointment.provider_id)?;
                let avatar = provider
                    .avatar_id
                    .and_then(|id| state.files.get(&id))
                    .cloned();

                Some(AppointmentWithProvider {
                    appointment: appointment.clone(),
                    provider: ProviderProfile {
                        id: provider.id,
                        name: provider.name.clone(),
                        avatar,
                    },
                })
            })
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();

        Ok(rows)
    }

    async fn find_active_in_slot(
        &self,
        provider_id: i64,
        date: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>> {
        Ok(self
            .state()
            .appointments
            .values()
            .find(|a| a.provider_id == provider_id && a.date == date && a.is_active())
            .cloned())
    }

    async fn insert(&self, new: NewAppointment) -> AgendaResult<Appointment> {
        let mut state = self.state();

        let taken = state
            .appointments
            .values()
            .any(|a| a.provider_id == new.provider_id && a.date == new.date && a.is_active());
        if taken {
            return Err(AgendaError::Validation(SLOT_UNAVAILABLE.to_string()));
        }

        state.last_appointment_id += 1;
        let now = Utc::now();
        let appointment = Appointment {
            id: state.last_appointment_id,
            user_id: new.user_id,
            provider_id: new.provider_id,
            date: new.date,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        };
        state.appointments.insert(appointment.id, appointment.clone());

        Ok(appointment)
    }

    async fn find_with_parties(&self, id: i64) -> AgendaResult<Option<AppointmentWithParties>> {
        let state = self.state();

        let record = state.appointments.get(&id).and_then(|appointment| {
            let provider = state.users.get(&appointment.provider_id)?;
            let user = state.users.get(&appointment.user_id)?;

            Some(AppointmentWithParties {
                appointment: appointment.clone(),
                provider: ProviderContact {
                    name: provider.name.clone(),
                    email: provider.email.clone(),
                },
                user: UserContact {
                    name: user.name.clone(),
                },
            })
        });

        Ok(record)
    }

    async fn mark_canceled(
        &self,
        id: i64,
        canceled_at: DateTime<Utc>,
    ) -> AgendaResult<Option<Appointment>> {
        let mut state = self.state();

        let appointment = state
            .appointments
            .get_mut(&id)
            .ok_or_else(|| AgendaError::NotFound(format!("Appointment with ID {} not found", id)))?;

        if !appointment.is_active() {
            return Ok(None);
        }

        appointment.canceled_at = Some(canceled_at);
        appointment.updated_at = canceled_at;

        Ok(Some(appointment.clone()))
    }
}

#[async_trait]
impl NotificationEmitter for InMemoryStore {
    async fn create(&self, new: NewNotification) -> AgendaResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            content: new.content,
            user_id: new.user_id,
            read: false,
            created_at: Utc::now(),
        };
        self.state().notifications.push(notification.clone());

        Ok(notification)
    }
}

#[async_trait]
impl JobDispatcher for InMemoryStore {
    async fn enqueue(&self, key: JobKey, payload: Value) -> AgendaResult<()> {
        self.state().jobs.push((key, payload));
        Ok(())
    }
}

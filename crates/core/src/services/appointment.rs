//! # Appointment Lifecycle
//!
//! [`AppointmentService`] owns the booking rules: who may book whom, which
//! hours are bookable, and until when an appointment can be canceled.
//!
//! ## Rules
//!
//! Booking checks run in this order and stop at the first failure:
//!
//! 1. The provider id must belong to a user flagged as provider
//! 2. Nobody can book themselves
//! 3. The requested hour (truncated) must not have started yet
//! 4. The provider must have no other active appointment in that hour
//!
//! Cancellation is reserved to the owner and closes two hours before the
//! appointment starts. A canceled appointment never changes again.
//!
//! ## Side effects
//!
//! Booking writes one notification for the provider and cancellation queues a
//! `CancellationMail` job. Both run after the appointment itself has been
//! stored, so their failures are logged and do not fail the request.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    calendar,
    errors::{
        AgendaError, AgendaResult, ALREADY_CANCELED, CANCELLATION_DEADLINE, NOT_A_PROVIDER,
        NOT_OWNER, PAST_DATE, SELF_BOOKING, SLOT_UNAVAILABLE,
    },
    models::{
        appointment::{
            Appointment, AppointmentResponse, AppointmentSummary, AppointmentWithParties,
            AppointmentWithProvider, AvatarSummary, BookingRequest, CreateAppointmentRequest,
            NewAppointment, Pagination, ProviderSummary,
        },
        job::{CancellationMailPayload, JobKey},
        notification::{NewNotification, Notification},
    },
    traits::{AppointmentStore, Clock, JobDispatcher, NotificationEmitter, SystemClock, UserStore},
};

/// Stateless entry point for listing, booking and canceling appointments.
///
/// Built once per process and shared behind an `Arc`; all state lives in the
/// injected collaborators.
pub struct AppointmentService {
    users: Arc<dyn UserStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifications: Arc<dyn NotificationEmitter>,
    jobs: Arc<dyn JobDispatcher>,
    clock: Arc<dyn Clock>,
    app_url: String,
}

impl AppointmentService {
    /// Creates a service on the system clock.
    ///
    /// `app_url` is the public base URL used to resolve avatar file URLs.
    pub fn new(
        users: Arc<dyn UserStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifications: Arc<dyn NotificationEmitter>,
        jobs: Arc<dyn JobDispatcher>,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            appointments,
            notifications,
            jobs,
            clock: Arc::new(SystemClock),
            app_url: app_url.into(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Lists the caller's active appointments, 20 per page, soonest first.
    pub async fn list(
        &self,
        user_id: i64,
        page: Option<i64>,
    ) -> AgendaResult<Vec<AppointmentSummary>> {
        let page = Pagination::new(page)?;
        let now = self.clock.now();

        let rows = self.appointments.list_active_by_user(user_id, page).await?;
        debug!(
            "Listed {} appointments for user={} page={}",
            rows.len(),
            user_id,
            page.page()
        );

        Ok(rows.into_iter().map(|row| self.summarize(row, now)).collect())
    }

    /// Books the hour containing `request.date` with `request.provider_id`.
    ///
    /// # Errors
    ///
    /// * `AgendaError::Validation` - Malformed body, past hour or taken slot
    /// * `AgendaError::Authorization` - Target is not a provider, or is the caller
    /// * `AgendaError::Database` - Persistence failure
    pub async fn create(
        &self,
        user_id: i64,
        request: &CreateAppointmentRequest,
    ) -> AgendaResult<AppointmentResponse> {
        let BookingRequest { provider_id, date } = request.validate()?;

        if self.users.find_provider(provider_id).await?.is_none() {
            return Err(AgendaError::Authorization(NOT_A_PROVIDER.to_string()));
        }

        if provider_id == user_id {
            return Err(AgendaError::Authorization(SELF_BOOKING.to_string()));
        }

        let hour_start = calendar::start_of_hour(date)?;
        let now = self.clock.now();

        if hour_start < now {
            return Err(AgendaError::Validation(PAST_DATE.to_string()));
        }

        if self
            .appointments
            .find_active_in_slot(provider_id, hour_start)
            .await?
            .is_some()
        {
            return Err(AgendaError::Validation(SLOT_UNAVAILABLE.to_string()));
        }

        let appointment = self
            .appointments
            .insert(NewAppointment {
                user_id,
                provider_id,
                date: hour_start,
            })
            .await?;

        info!(
            "Appointment booked: id={}, user={}, provider={}, date={}",
            appointment.id, user_id, provider_id, appointment.date
        );

        if let Err(e) = self.notify_provider(&appointment).await {
            warn!(
                "Could not notify provider {} about appointment {}: {}",
                appointment.provider_id, appointment.id, e
            );
        }

        Ok(appointment.view(now))
    }

    /// Cancels one of the caller's appointments and queues the cancellation email.
    ///
    /// # Errors
    ///
    /// * `AgendaError::NotFound` - No appointment with that id
    /// * `AgendaError::Authorization` - The caller does not own it
    /// * `AgendaError::Validation` - It was already canceled
    /// * `AgendaError::BusinessRule` - Less than two hours remain
    pub async fn cancel(
        &self,
        user_id: i64,
        appointment_id: i64,
    ) -> AgendaResult<AppointmentResponse> {
        let record = self
            .appointments
            .find_with_parties(appointment_id)
            .await?
            .ok_or_else(|| {
                AgendaError::NotFound(format!("Appointment with ID {} not found", appointment_id))
            })?;

        if record.appointment.user_id != user_id {
            return Err(AgendaError::Authorization(NOT_OWNER.to_string()));
        }

        if !record.appointment.is_active() {
            return Err(AgendaError::Validation(ALREADY_CANCELED.to_string()));
        }

        let now = self.clock.now();
        if record.appointment.cancellation_deadline() < now {
            return Err(AgendaError::BusinessRule(CANCELLATION_DEADLINE.to_string()));
        }

        let canceled = self
            .appointments
            .mark_canceled(appointment_id, now)
            .await?
            .ok_or_else(|| AgendaError::Validation(ALREADY_CANCELED.to_string()))?;

        info!(
            "Appointment canceled: id={}, user={}, provider={}",
            canceled.id, canceled.user_id, canceled.provider_id
        );

        let snapshot = AppointmentWithParties {
            appointment: canceled.clone(),
            ..record
        };
        if let Err(e) = self.enqueue_cancellation_mail(snapshot).await {
            error!(
                "Could not queue cancellation mail for appointment {}: {}",
                canceled.id, e
            );
        }

        Ok(canceled.view(now))
    }

    async fn notify_provider(&self, appointment: &Appointment) -> AgendaResult<Notification> {
        let user = self
            .users
            .find_user(appointment.user_id)
            .await?
            .ok_or_else(|| {
                AgendaError::NotFound(format!("User with ID {} not found", appointment.user_id))
            })?;

        let content = format!(
            "New appointment from {} for {}",
            user.name,
            calendar::format_booking_date(appointment.date)
        );

        self.notifications
            .create(NewNotification {
                content,
                user_id: appointment.provider_id,
            })
            .await
    }

    async fn enqueue_cancellation_mail(&self, snapshot: AppointmentWithParties) -> AgendaResult<()> {
        let payload = serde_json::to_value(CancellationMailPayload::from(snapshot))
            .map_err(|e| AgendaError::Internal(Box::new(e)))?;

        self.jobs.enqueue(JobKey::CancellationMail, payload).await
    }

    fn summarize(
        &self,
        row: AppointmentWithProvider,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppointmentSummary {
        let AppointmentWithProvider {
            appointment,
            provider,
        } = row;

        AppointmentSummary {
            id: appointment.id,
            date: appointment.date,
            past: appointment.is_past(now),
            cancelable: appointment.is_cancelable(now),
            provider: ProviderSummary {
                id: provider.id,
                name: provider.name,
                avatar: provider.avatar.map(|file| AvatarSummary {
                    url: file.url(&self.app_url),
                    id: file.id,
                    path: file.path,
                }),
            },
        }
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    calendar,
    errors::{AgendaError, AgendaResult, VALIDATION_FAILED},
    models::user::{ProviderContact, ProviderProfile, UserContact},
};

/// Appointments returned per listing page.
pub const PAGE_SIZE: i64 = 20;

/// How long before the scheduled time an appointment can still be canceled.
pub const CANCELLATION_WINDOW_HOURS: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub provider_id: i64,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.canceled_at.is_none()
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    /// Last instant at which the owner may still cancel.
    pub fn cancellation_deadline(&self) -> DateTime<Utc> {
        self.date - Duration::hours(CANCELLATION_WINDOW_HOURS)
    }

    /// Display flag. Strict, so it already reads false at the deadline itself,
    /// while `AppointmentService::cancel` still accepts that exact instant.
    pub fn is_cancelable(&self, now: DateTime<Utc>) -> bool {
        now < self.cancellation_deadline()
    }

    /// Attaches the derived `past`/`cancelable` flags as seen at `now`.
    pub fn view(self, now: DateTime<Utc>) -> AppointmentResponse {
        AppointmentResponse {
            past: self.is_past(now),
            cancelable: self.is_cancelable(now),
            appointment: self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub user_id: i64,
    pub provider_id: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub past: bool,
    pub cancelable: bool,
}

/// An active appointment joined with its provider and the provider's avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentWithProvider {
    pub appointment: Appointment,
    pub provider: ProviderProfile,
}

/// An appointment joined with both parties, as needed by the cancellation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentWithParties {
    pub appointment: Appointment,
    pub provider: ProviderContact,
    pub user: UserContact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub past: bool,
    pub cancelable: bool,
    pub provider: ProviderSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: i64,
    pub name: String,
    pub avatar: Option<AvatarSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarSummary {
    pub id: i64,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAppointmentsQuery {
    pub page: Option<i64>,
}

/// 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    offset: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>) -> AgendaResult<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(AgendaError::Validation(format!(
                "Page must be 1 or greater, got {}",
                page
            )));
        }
        let offset = (page - 1).checked_mul(PAGE_SIZE).ok_or_else(|| {
            AgendaError::Validation(format!("Page {} is out of range", page))
        })?;
        Ok(Self { page, offset })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, offset: 0 }
    }
}

/// Raw booking body. Fields stay untyped so that shape errors surface as
/// validation failures rather than extractor rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub provider_id: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub provider_id: i64,
    pub date: DateTime<Utc>,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> AgendaResult<BookingRequest> {
        let invalid = || AgendaError::Validation(VALIDATION_FAILED.to_string());

        let provider_id = self
            .provider_id
            .as_ref()
            .and_then(parse_numeric_id)
            .ok_or_else(invalid)?;
        let date = self
            .date
            .as_ref()
            .and_then(calendar::parse_date)
            .ok_or_else(invalid)?;

        Ok(BookingRequest { provider_id, date })
    }
}

fn parse_numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

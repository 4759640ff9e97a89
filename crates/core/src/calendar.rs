//! Date helpers shared by the booking rules and the notification texts.
//!
//! Appointments live on hour boundaries, so every requested date goes through
//! [`start_of_hour`] before it is compared or stored. Dates shown to people are
//! rendered in Brazilian Portuguese, e.g. `dia 17 de outubro, às 10:00h`.

use chrono::{
    DateTime, Duration, DurationRound, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde_json::Value;

use crate::errors::{AgendaError, AgendaResult};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Truncates `date` to the start of its hour.
pub fn start_of_hour(date: DateTime<Utc>) -> AgendaResult<DateTime<Utc>> {
    date.duration_trunc(Duration::hours(1))
        .map_err(|e| AgendaError::Validation(format!("Invalid date: {}", e)))
}

/// Parses a JSON date value.
///
/// Accepts RFC 3339 strings, offset-less ISO-8601 date-times (read as UTC),
/// plain `YYYY-MM-DD` dates (midnight UTC) and epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_date_str(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_date_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Renders a booking date the way providers read it in notifications and emails.
pub fn format_booking_date(date: DateTime<Utc>) -> String {
    date.format_localized("dia %d de %B, às %-H:%Mh", Locale::pt_BR)
        .to_string()
}

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, to_value};
use agenda_core::models::{
    appointment::{Appointment, AppointmentWithParties, CreateAppointmentRequest},
    job::{CancellationMailPayload, JobKey, JobStatus},
    user::{File, ProviderContact, UserContact},
};

fn sample_appointment() -> Appointment {
    let date = Utc.with_ymd_and_hms(2030, 5, 20, 14, 0, 0).unwrap();
    Appointment {
        id: 9,
        user_id: 1,
        provider_id: 2,
        date,
        canceled_at: None,
        created_at: date - Duration::days(3),
        updated_at: date - Duration::days(3),
    }
}

#[test]
fn test_appointment_view_flattens_flags() {
    let appointment = sample_appointment();
    let now = appointment.date - Duration::hours(5);

    let value = to_value(appointment.clone().view(now)).expect("Failed to serialize view");

    assert_eq!(value["id"], json!(9));
    assert_eq!(value["provider_id"], json!(2));
    assert_eq!(value["canceled_at"], json!(null));
    assert_eq!(value["past"], json!(false));
    assert_eq!(value["cancelable"], json!(true));
}

#[test]
fn test_past_appointment_is_neither_upcoming_nor_cancelable() {
    let appointment = sample_appointment();
    let now = appointment.date + Duration::minutes(1);

    let view = appointment.view(now);
    assert!(view.past);
    assert!(!view.cancelable);
}

#[test]
fn test_create_request_tolerates_missing_fields() {
    let request: CreateAppointmentRequest =
        serde_json::from_value(json!({ "date": "2030-05-20T14:00:00Z" }))
            .expect("Failed to deserialize request");

    assert!(request.provider_id.is_none());
    assert!(request.validate().is_err());
}

#[test]
fn test_file_url_joins_base() {
    let file = File {
        id: 3,
        name: "me.png".to_string(),
        path: "abc123.png".to_string(),
    };

    assert_eq!(file.url("http://localhost:3000"), "http://localhost:3000/files/abc123.png");
    assert_eq!(file.url("https://cdn.example.com/"), "https://cdn.example.com/files/abc123.png");
}

#[test]
fn test_job_key_round_trip_through_text() {
    assert_eq!(JobKey::CancellationMail.as_str(), "CancellationMail");
    assert_eq!("CancellationMail".parse::<JobKey>().unwrap(), JobKey::CancellationMail);
    assert!("SendInvoice".parse::<JobKey>().is_err());

    assert_eq!("failed".parse::<JobStatus>().unwrap(), JobStatus::Failed);
    assert_eq!(JobStatus::Pending.as_str(), "pending");
}

#[test]
fn test_cancellation_payload_carries_both_parties() {
    let mut appointment = sample_appointment();
    appointment.canceled_at = Some(appointment.date - Duration::days(1));

    let payload = CancellationMailPayload::from(AppointmentWithParties {
        appointment: appointment.clone(),
        provider: ProviderContact {
            name: "Dra. Helena".to_string(),
            email: "helena@example.com".to_string(),
        },
        user: UserContact {
            name: "Bruno".to_string(),
        },
    });

    let value = to_value(&payload).unwrap();
    assert_eq!(value["appointment"]["provider"]["email"], json!("helena@example.com"));
    assert_eq!(value["appointment"]["user"]["name"], json!("Bruno"));
    assert_eq!(payload.appointment.canceled_at, appointment.canceled_at);
}

use std::sync::Arc;

use agenda_core::{
    errors::{AgendaError, CANCELLATION_DEADLINE, NOT_OWNER, VALIDATION_FAILED},
    models::job::JobKey,
};
use agenda_db::mock::repositories::{MockJobQueue, MockNotificationRepo};
use axum::http::StatusCode;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{as_user, now, TestContext, CUSTOMER, OTHER_CUSTOMER, PROVIDER};

fn parse(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_create_appointment() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .post("/appointments")
        .add_header(name, value)
        .json(&json!({ "provider_id": PROVIDER, "date": "2030-05-21T10:45:00Z" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["user_id"], json!(CUSTOMER));
    assert_eq!(body["provider_id"], json!(PROVIDER));
    assert_eq!(
        parse(&body["date"]),
        Utc.with_ymd_and_hms(2030, 5, 21, 10, 0, 0).unwrap()
    );
    assert_eq!(body["canceled_at"], Value::Null);
    assert_eq!(body["past"], json!(false));
    assert_eq!(body["cancelable"], json!(true));

    let notifications = ctx.store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, PROVIDER);
    assert!(notifications[0].content.starts_with("New appointment from Alice"));
}

#[tokio::test]
async fn test_create_appointment_without_identity() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/appointments")
        .json(&json!({ "provider_id": PROVIDER, "date": "2030-05-21T10:00:00Z" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Authentication error: Missing caller identity" })
    );
    assert!(ctx.store.appointments().is_empty());
}

#[rstest]
#[case::missing_fields(json!({}))]
#[case::bad_date(json!({ "provider_id": PROVIDER, "date": "next tuesday" }))]
#[case::past_hour(json!({ "provider_id": PROVIDER, "date": "2030-05-20T07:00:00Z" }))]
#[case::string_body(json!("x"))]
#[case::null_body(Value::Null)]
#[case::array_body(json!([]))]
#[tokio::test]
async fn test_create_appointment_bad_request(#[case] payload: Value) {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .post("/appointments")
        .add_header(name, value)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert!(ctx.store.appointments().is_empty());
}

#[tokio::test]
async fn test_create_appointment_plain_text_body() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .post("/appointments")
        .add_header(name, value)
        .text("provider_id=2")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": format!("Validation error: {}", VALIDATION_FAILED) })
    );
    assert!(ctx.store.appointments().is_empty());
}

#[tokio::test]
async fn test_create_appointment_with_self() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(PROVIDER);

    let response = server
        .post("/appointments")
        .add_header(name, value)
        .json(&json!({ "provider_id": PROVIDER, "date": "2030-05-21T10:00:00Z" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.store.notifications().is_empty());
}

#[tokio::test]
async fn test_create_appointment_survives_notification_failure() {
    let ctx = TestContext::new();

    let mut notifications = MockNotificationRepo::new();
    notifications
        .expect_create()
        .times(1)
        .returning(|_| Err(AgendaError::Database(eyre::eyre!("notifications table is gone"))));
    let mut jobs = MockJobQueue::new();
    jobs.expect_enqueue().times(0);

    let server = ctx.server_with(ctx.state_with(Arc::new(notifications), Arc::new(jobs)));
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .post("/appointments")
        .add_header(name, value)
        .json(&json!({ "provider_id": PROVIDER, "date": "2030-05-21T10:00:00Z" }))
        .await;

    response.assert_status_ok();
    assert_eq!(ctx.store.appointments().len(), 1);
}

#[tokio::test]
async fn test_list_appointments_page() {
    let ctx = TestContext::new();
    for id in 1..=25 {
        ctx.seed(id, CUSTOMER, now() + Duration::days(id));
    }
    ctx.seed(26, OTHER_CUSTOMER, now() + Duration::days(1) + Duration::hours(1));
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .get("/appointments")
        .add_query_param("page", 2)
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body = response.json::<Vec<Value>>();
    let ids: Vec<i64> = body.iter().map(|a| a["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, (21..=25).collect::<Vec<_>>());
    assert_eq!(body[0]["provider"]["name"], json!("Bob Barber"));
    assert_eq!(
        body[0]["provider"]["avatar"]["url"],
        json!("http://localhost:3333/files/bob-avatar.png")
    );
}

#[tokio::test]
async fn test_list_appointments_rejects_page_zero() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .get("/appointments")
        .add_query_param("page", 0)
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[rstest]
#[case::not_a_number("abc")]
#[case::overflowing_offset("9223372036854775807")]
#[tokio::test]
async fn test_list_appointments_bad_page(#[case] page: &str) {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server
        .get("/appointments")
        .add_query_param("page", page)
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_cancel_appointment_bad_id() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server.delete("/appointments/abc").add_header(name, value).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_cancel_appointment() {
    let ctx = TestContext::new();
    ctx.seed(1, CUSTOMER, now() + Duration::hours(5));
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server.delete("/appointments/1").add_header(name, value).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(parse(&body["canceled_at"]), now());
    assert_eq!(body["cancelable"], json!(true));

    let jobs = ctx.store.enqueued_jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].0, JobKey::CancellationMail);
    assert_eq!(jobs[0].1["appointment"]["user"]["name"], json!("Alice"));
}

#[tokio::test]
async fn test_cancel_appointment_too_late() {
    let ctx = TestContext::new();
    ctx.seed(1, CUSTOMER, now() + Duration::minutes(90));
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server.delete("/appointments/1").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        json!(format!("Business rule violation: {}", CANCELLATION_DEADLINE))
    );
    assert!(ctx.store.appointment(1).unwrap().canceled_at.is_none());
}

#[tokio::test]
async fn test_cancel_someone_elses_appointment() {
    let ctx = TestContext::new();
    ctx.seed(1, CUSTOMER, now() + Duration::hours(5));

    let mut jobs = MockJobQueue::new();
    jobs.expect_enqueue().times(0);
    let server = ctx.server_with(ctx.state_with(ctx.store.clone(), Arc::new(jobs)));
    let (name, value) = as_user(OTHER_CUSTOMER);

    let response = server.delete("/appointments/1").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        json!(format!("Authorization error: {}", NOT_OWNER))
    );
    assert!(ctx.store.appointment(1).unwrap().canceled_at.is_none());
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (name, value) = as_user(CUSTOMER);

    let response = server.delete("/appointments/99").add_header(name, value).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_twice() {
    let ctx = TestContext::new();
    ctx.seed(1, CUSTOMER, now() + Duration::hours(5));
    let server = ctx.server();

    let (name, value) = as_user(CUSTOMER);
    server
        .delete("/appointments/1")
        .add_header(name, value)
        .await
        .assert_status_ok();

    let (name, value) = as_user(CUSTOMER);
    let response = server.delete("/appointments/1").add_header(name, value).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.enqueued_jobs().len(), 1);
}

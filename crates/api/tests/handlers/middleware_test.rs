use agenda_api::middleware::{auth::AuthUser, error_handling::map_error};
use agenda_core::errors::AgendaError;
use axum::{extract::FromRequestParts, http::{Request, StatusCode}};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::TestContext;

#[rstest]
#[case::not_found(AgendaError::NotFound("Appointment with ID 1 not found".into()), StatusCode::NOT_FOUND)]
#[case::validation(AgendaError::Validation("Validation failed".into()), StatusCode::BAD_REQUEST)]
#[case::authentication(AgendaError::Authentication("Missing caller identity".into()), StatusCode::UNAUTHORIZED)]
#[case::authorization(AgendaError::Authorization("Not your appointment".into()), StatusCode::UNAUTHORIZED)]
#[case::business_rule(AgendaError::BusinessRule("Too late".into()), StatusCode::UNAUTHORIZED)]
#[case::database(AgendaError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: AgendaError, #[case] status: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), status);
}

#[test]
fn test_error_handling_internal() {
    let error = AgendaError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

async fn extract(header: Option<&str>) -> Result<AuthUser, StatusCode> {
    let ctx = TestContext::new();
    let state = ctx.state();

    let mut builder = Request::builder().uri("/appointments");
    if let Some(value) = header {
        builder = builder.header("x-user-id", value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();

    AuthUser::from_request_parts(&mut parts, &state)
        .await
        .map_err(|e| e.status())
}

#[tokio::test]
async fn test_auth_user_from_header() {
    assert_eq!(extract(Some(" 42 ")).await, Ok(AuthUser(42)));
}

#[rstest]
#[case::missing(None)]
#[case::not_a_number(Some("alice"))]
#[tokio::test]
async fn test_auth_user_rejects_bad_identity(#[case] header: Option<&str>) {
    assert_eq!(extract(header).await, Err(StatusCode::UNAUTHORIZED));
}

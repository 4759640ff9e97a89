use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_serves_uploaded_file() {
    let ctx = TestContext::new();
    std::fs::write(ctx.uploads.path().join("bob-avatar.png"), b"not really a png").unwrap();
    let server = ctx.server();

    let response = server.get("/files/bob-avatar.png").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "not really a png");
}

#[tokio::test]
async fn test_missing_file() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/files/nobody.png").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

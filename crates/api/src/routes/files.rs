use axum::Router;
use std::{path::Path, sync::Arc};
use tower_http::services::ServeDir;

use crate::ApiState;

/// Serves uploaded files (provider avatars) under `/files`.
pub fn routes(uploads_dir: &Path) -> Router<Arc<ApiState>> {
    Router::new().nest_service("/files", ServeDir::new(uploads_dir))
}

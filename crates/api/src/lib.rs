//! # Agenda API
//!
//! The API crate provides the web server for the Agenda appointment service.
//! It exposes booking, listing and cancellation of appointments over HTTP.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into service calls
//! - **Middleware**: Caller identity and error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! Booking rules live in `agenda-core`; persistence in `agenda-db`.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for caller identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{path::Path, sync::Arc};

use axum::Router;
use agenda_core::services::AppointmentService;
use agenda_db::PgStore;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Booking rules and their collaborators
    pub service: AppointmentService,

    /// Header the upstream auth layer uses to pass the user id
    pub user_id_header: String,

    /// Pool probed by the health check, when running against PostgreSQL
    pub db_pool: Option<PgPool>,
}

impl ApiState {
    /// Wires the appointment service to PostgreSQL for every collaborator.
    pub fn from_pool(config: &config::ApiConfig, db_pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db_pool.clone()));
        let service = AppointmentService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config.app_url.clone(),
        );

        Self {
            service,
            user_id_header: config.user_id_header.clone(),
            db_pool: Some(db_pool),
        }
    }
}

/// Builds the application router with every route and the shared state attached
pub fn app(state: Arc<ApiState>, uploads_dir: &Path) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Appointment endpoints
        .merge(routes::appointment::routes())
        // Uploaded files
        .merge(routes::files::routes(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, wires the service to the database,
/// configures routes and middleware, and serves HTTP until the process stops.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState::from_pool(&config, db_pool));

    let app = app(state, &config.uploads_dir);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<axum::http::HeaderValue>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(handle_timeout))
            .timeout(std::time::Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_timeout(err: tower::BoxError) -> (axum::http::StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            axum::http::StatusCode::REQUEST_TIMEOUT,
            "Request timed out".to_string(),
        )
    } else {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

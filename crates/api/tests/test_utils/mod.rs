use std::sync::Arc;

use agenda_api::{app, ApiState};
use agenda_core::{
    memory::InMemoryStore,
    models::{
        appointment::Appointment,
        user::{File, User},
    },
    services::AppointmentService,
    traits::{FixedClock, JobDispatcher, NotificationEmitter},
};
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

pub const CUSTOMER: i64 = 1;
pub const PROVIDER: i64 = 2;
pub const OTHER_CUSTOMER: i64 = 3;
pub const AVATAR: i64 = 10;

pub const APP_URL: &str = "http://localhost:3333";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 5, 20, 8, 30, 0).unwrap()
}

/// Identity header as forwarded by the upstream auth layer.
pub fn as_user(id: i64) -> (HeaderName, HeaderValue) {
    (HeaderName::from_static("x-user-id"), HeaderValue::from(id))
}

fn user(id: i64, name: &str, provider: bool, avatar_id: Option<i64>) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("user{}@example.com", id),
        provider,
        avatar_id,
        created_at: now() - Duration::days(30),
        updated_at: now() - Duration::days(30),
    }
}

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub uploads: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        store.add_file(File {
            id: AVATAR,
            name: "bob.png".to_string(),
            path: "bob-avatar.png".to_string(),
        });
        store.add_user(user(CUSTOMER, "Alice", false, None));
        store.add_user(user(PROVIDER, "Bob Barber", true, Some(AVATAR)));
        store.add_user(user(OTHER_CUSTOMER, "Carol", false, None));

        Self {
            store,
            uploads: TempDir::new().unwrap(),
        }
    }

    pub fn seed(&self, id: i64, user_id: i64, date: DateTime<Utc>) {
        self.store.seed_appointment(Appointment {
            id,
            user_id,
            provider_id: PROVIDER,
            date,
            canceled_at: None,
            created_at: now() - Duration::days(1),
            updated_at: now() - Duration::days(1),
        });
    }

    /// State backed entirely by the in-memory store.
    pub fn state(&self) -> Arc<ApiState> {
        self.state_with(self.store.clone(), self.store.clone())
    }

    /// State with replacement side-effect collaborators.
    pub fn state_with(
        &self,
        notifications: Arc<dyn NotificationEmitter>,
        jobs: Arc<dyn JobDispatcher>,
    ) -> Arc<ApiState> {
        let service = AppointmentService::new(
            self.store.clone(),
            self.store.clone(),
            notifications,
            jobs,
            APP_URL,
        )
        .with_clock(Arc::new(FixedClock(now())));

        Arc::new(ApiState {
            service,
            user_id_header: "x-user-id".to_string(),
            db_pool: None,
        })
    }

    pub fn server(&self) -> TestServer {
        self.server_with(self.state())
    }

    pub fn server_with(&self, state: Arc<ApiState>) -> TestServer {
        TestServer::new(app(state, self.uploads.path())).unwrap()
    }
}

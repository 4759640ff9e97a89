use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use serde_json::Value;
use agenda_core::{
    errors::AgendaResult,
    models::{
        appointment::{
            Appointment, AppointmentWithParties, AppointmentWithProvider, NewAppointment,
            Pagination,
        },
        job::JobKey,
        notification::{NewNotification, Notification},
        user::User,
    },
    traits::{AppointmentStore, JobDispatcher, NotificationEmitter, UserStore},
};

// Mock collaborators for testing
mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserStore for UserRepo {
        async fn find_provider(&self, id: i64) -> AgendaResult<Option<User>>;

        async fn find_user(&self, id: i64) -> AgendaResult<Option<User>>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn list_active_by_user(
            &self,
            user_id: i64,
            page: Pagination,
        ) -> AgendaResult<Vec<AppointmentWithProvider>>;

        async fn find_active_in_slot(
            &self,
            provider_id: i64,
            date: DateTime<Utc>,
        ) -> AgendaResult<Option<Appointment>>;

        async fn insert(&self, appointment: NewAppointment) -> AgendaResult<Appointment>;

        async fn find_with_parties(
            &self,
            id: i64,
        ) -> AgendaResult<Option<AppointmentWithParties>>;

        async fn mark_canceled(
            &self,
            id: i64,
            canceled_at: DateTime<Utc>,
        ) -> AgendaResult<Option<Appointment>>;
    }
}

mock! {
    pub NotificationRepo {}

    #[async_trait]
    impl NotificationEmitter for NotificationRepo {
        async fn create(&self, notification: NewNotification) -> AgendaResult<Notification>;
    }
}

mock! {
    pub JobQueue {}

    #[async_trait]
    impl JobDispatcher for JobQueue {
        async fn enqueue(&self, key: JobKey, payload: Value) -> AgendaResult<()>;
    }
}

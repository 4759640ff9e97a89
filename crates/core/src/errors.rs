use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    /// A booking rule was violated by an otherwise authorized caller.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type AgendaResult<T> = Result<T, AgendaError>;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const NOT_A_PROVIDER: &str = "You can only schedule appointments with service providers";
pub const SELF_BOOKING: &str = "You cannot schedule an appointment with yourself";
pub const PAST_DATE: &str = "Past dates are not allowed";
pub const SLOT_UNAVAILABLE: &str = "Appointment date is not available";
pub const NOT_OWNER: &str = "You don't have permission to cancel this appointment";
pub const CANCELLATION_DEADLINE: &str =
    "Cancellation deadline is 2 hours before the scheduled time";
pub const ALREADY_CANCELED: &str = "Appointment has already been canceled";

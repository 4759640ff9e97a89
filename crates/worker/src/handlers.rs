use eyre::{Result, WrapErr};
use agenda_core::{
    calendar,
    models::job::{CancellationMailPayload, Job, JobKey},
};

use crate::mailer::{MailMessage, Mailer};

/// Runs a claimed job to completion.
pub async fn run<M: Mailer + ?Sized>(job: &Job, mailer: &M) -> Result<()> {
    match job.key {
        JobKey::CancellationMail => {
            let payload: CancellationMailPayload = serde_json::from_value(job.payload.clone())
                .wrap_err("Malformed CancellationMail payload")?;

            mailer.send(render_cancellation_mail(&payload)).await
        }
    }
}

/// Builds the email telling a provider that a customer canceled.
pub fn render_cancellation_mail(payload: &CancellationMailPayload) -> MailMessage {
    let appointment = &payload.appointment;

    MailMessage {
        to: format!(
            "{} <{}>",
            appointment.provider.name, appointment.provider.email
        ),
        subject: "Appointment canceled".to_string(),
        body: format!(
            "Hello {},\n\n{} canceled the appointment scheduled for {}.\n\nThis slot is open for new bookings again.\n",
            appointment.provider.name,
            appointment.user.name,
            calendar::format_booking_date(appointment.date)
        ),
    }
}

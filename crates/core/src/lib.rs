//! # Agenda Core
//!
//! Domain types and booking rules for the Agenda appointment service.
//!
//! - [`models`]: appointments, users, notifications and deferred jobs
//! - [`services::AppointmentService`]: list, book and cancel
//! - [`traits`]: the persistence, notification and job contracts it depends on
//! - [`memory`]: an in-process implementation of those contracts

pub mod calendar;
pub mod errors;
pub mod logging;
pub mod memory;
pub mod models;
pub mod services;
pub mod traits;

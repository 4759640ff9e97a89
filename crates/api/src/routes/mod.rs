pub mod appointment;
pub mod files;
pub mod health;

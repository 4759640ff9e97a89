mod appointment_test;
mod files_test;
mod health_test;
mod middleware_test;

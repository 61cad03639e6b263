//! Request handlers for all API endpoints.

pub mod explorer;
pub mod health;
pub mod scheduler;
pub mod settings;

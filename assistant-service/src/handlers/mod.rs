//! HTTP handlers for the assistant service.

pub mod agent;
pub mod health;

pub use agent::run_agent;
pub use health::{health_check, readiness_check};

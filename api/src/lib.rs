//! HTTP surface of the travel list authentication service
//!
//! Exposed as a library so integration tests can build the app with
//! in-memory collaborators.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;

pub use app::{create_app, AppState};

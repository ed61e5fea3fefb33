//! Portfolio API: contact-form backend for a personal portfolio site.
//!
//! Exposes a liveness check, a contact submission endpoint that validates and
//! stores messages in a document store, and a database connectivity probe.

pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;

//! deme-error: endpoints for exercising log and alert pipelines.
//!
//! Exposes `GET /api/health`, which always answers `ok`, and
//! `GET /api/error-test`, which always fails with a 500 so operators can
//! verify that handler errors show up in their logging and alerting.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

pub use error::{AppError, AppResult};
pub use routes::create_router;

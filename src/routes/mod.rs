//! HTTP route table.
//!
//! All endpoints live under `/api`. The fault boundary is two layers deep:
//! handler errors are turned into responses by `AppError`'s `IntoResponse`,
//! and handler panics are caught by `CatchPanicLayer`. Both produce an
//! empty-bodied 500.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::middleware::{handle_panic, request_id_layer};

/// Creates the Axum router with all routes and middleware.
pub fn create_router() -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/error-test", get(error_test::error_test));

    with_fault_boundary(Router::new().nest("/api", api_routes))
}

/// Wrap a router in the request span and the panic boundary.
pub fn with_fault_boundary(router: Router) -> Router {
    router
        // Panic boundary - sits inside the request span so panics are correlated
        .layer(CatchPanicLayer::custom(handle_panic))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

//! Handler error type and the fault boundary that turns it into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The handler reached a state it must never complete from.
    #[error("Illegal state: {0}")]
    IllegalState(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::IllegalState(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, "Unhandled handler error");

        // The message stays in the logs; clients only see the status.
        status.into_response()
    }
}

/// Convenience Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

//! Request-scoped middleware.
//!
//! - [`request_id_layer`] generates a UUID v4 for each incoming request and
//!   creates a tracing span that wraps the entire request lifecycle. All logs
//!   emitted during request processing include the request_id field.
//! - [`handle_panic`] is the response factory for `CatchPanicLayer`, so a
//!   panicking handler surfaces the same way as a returned error.

use std::any::Any;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use tracing::Instrument;
use uuid::Uuid;

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
/// Completion is logged at a level matching the status class, so alert rules
/// can key on `ERROR` lines for server failures.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    // Root span for everything the request logs
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::Span::current().record("duration_ms", duration_ms);

        log_completion(response.status(), duration_ms);
        response
    }
    .instrument(span)
    .await
}

fn log_completion(status: StatusCode, duration_ms: u64) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = status_code, duration_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(status = status_code, duration_ms, "Request rejected");
    } else {
        tracing::info!(status = status_code, duration_ms, "Request completed");
    }
}

/// Convert a caught handler panic into an empty 500 response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };

    tracing::error!(panic = %detail, "Handler panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::routes::with_fault_boundary;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn panics() -> &'static str {
        panic!("handler exploded");
    }

    async fn echo_request_id(Extension(RequestId(id)): Extension<RequestId>) -> String {
        id.to_string()
    }

    fn test_router() -> Router {
        with_fault_boundary(
            Router::new()
                .route("/panic", get(panics))
                .route("/id", get(echo_request_id)),
        )
    }

    fn get_request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_panic_becomes_empty_500() {
        let response = test_router()
            .oneshot(get_request("/panic"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_request_id_is_available_to_handlers() {
        let response = test_router()
            .oneshot(get_request("/id"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        let id = std::str::from_utf8(&body).unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_handle_panic_accepts_any_payload() {
        let response = handle_panic(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new("static message"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_completion_level_follows_status_class() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_completion(StatusCode::OK, 1);
            log_completion(StatusCode::NOT_FOUND, 2);
            log_completion(StatusCode::INTERNAL_SERVER_ERROR, 3);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("INFO") && lines[0].contains("status=200"));
        assert!(lines[1].contains("WARN") && lines[1].contains("status=404"));
        assert!(lines[2].contains("ERROR") && lines[2].contains("status=500"));
    }
}

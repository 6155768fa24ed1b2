//! Request observation middleware.
//!
//! Wraps the router: waits for the response, then reports its status to
//! the access log and the request metrics. Runs inside the request span,
//! so log lines carry the request ID.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;

/// What is known about a request before it reaches the handler.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub source: String,
    pub method: Method,
    pub path: String,
    started: Instant,
}

impl RequestRecord {
    pub fn begin(request: &Request<Body>) -> Self {
        let source = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            source,
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            started: Instant::now(),
        }
    }

    /// Log and count the completed request.
    pub fn finish(&self, status: StatusCode) -> Duration {
        let duration = self.started.elapsed();
        tracing::info!(
            source = %self.source,
            method = %self.method,
            path = %self.path,
            status = status.as_u16(),
            duration = ?duration,
            "query executed"
        );
        metrics::record_request(self.method.as_str(), &self.path, status.as_u16(), duration);
        duration
    }
}

/// Middleware entry point for `axum::middleware::from_fn`.
pub async fn observe_request(request: Request<Body>, next: Next) -> Response {
    let record = RequestRecord::begin(&request);
    let response = next.run(request).await;
    record.finish(response.status());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::metrics::init_metrics;
    use axum::{middleware, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn counter_value(rendered: &str, path: &str, status: &str) -> Option<u64> {
        rendered
            .lines()
            .find(|l| {
                l.starts_with("http_total_requests{")
                    && l.contains(&format!(r#"route="{}""#, path))
                    && l.contains(&format!(r#"status="{}""#, status))
            })
            .and_then(|l| l.rsplit(' ').next())
            .and_then(|v| v.parse().ok())
    }

    #[tokio::test]
    async fn records_status_of_every_request() {
        let handle = init_metrics().expect("recorder installed");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let app = Router::new()
            .fallback(move |request: Request<Body>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if request.uri().path() == "/observer-fail" {
                        StatusCode::BAD_REQUEST
                    } else {
                        StatusCode::OK
                    }
                }
            })
            .layer(middleware::from_fn(observe_request));

        for _ in 0..5 {
            for path in ["/observer-test", "/observer-fail"] {
                let request = Request::builder().uri(path).body(Body::empty()).unwrap();
                app.clone().oneshot(request).await.unwrap();
            }
        }

        let rendered = handle.render();
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(counter_value(&rendered, "/observer-test", "200"), Some(5));
        assert_eq!(counter_value(&rendered, "/observer-fail", "400"), Some(5));
    }

    #[tokio::test]
    async fn handler_without_explicit_status_is_ok() {
        let app = Router::new()
            .route("/observer-default", get(|| async { "done" }))
            .layer(middleware::from_fn(observe_request));

        let request = Request::builder()
            .uri("/observer-default")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn source_defaults_without_connect_info() {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/todos/3?x=1")
            .body(Body::empty())
            .unwrap();
        let record = RequestRecord::begin(&request);
        assert_eq!(record.source, "unknown");
        assert_eq!(record.path, "/api/v1/todos/3");
        assert_eq!(record.method, Method::DELETE);
    }
}

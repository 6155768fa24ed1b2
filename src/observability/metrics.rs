//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_total_requests` (counter): completed requests by method, route, status
//! - `http_duration_seconds` (histogram): latency distribution, same labels
//!
//! # Design Decisions
//! - One Prometheus recorder per process, installed on first use
//! - Exposed on the API listener at `/metrics`
//! - Buckets match the Prometheus client defaults

use std::sync::OnceLock;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics::Unit;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use crate::http::server::AppState;

pub const HTTP_TOTAL_REQUESTS: &str = "http_total_requests";
pub const HTTP_DURATION_SECONDS: &str = "http_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the global Prometheus recorder and return its handle.
///
/// Safe to call repeatedly; later calls return the first handle. Returns
/// `None` if the recorder could not be installed.
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_init(|| match install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        })
        .clone()
}

fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    metrics::describe_counter!(HTTP_TOTAL_REQUESTS, "The total number of completed requests");
    metrics::describe_histogram!(
        HTTP_DURATION_SECONDS,
        Unit::Seconds,
        "Histogram of response time for requests in seconds"
    );

    Ok(handle)
}

/// Periodically drain histogram buffers so memory stays bounded between scrapes.
pub fn spawn_upkeep(handle: PrometheusHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(HTTP_TOTAL_REQUESTS, &labels).increment(1);
    metrics::histogram!(HTTP_DURATION_SECONDS, &labels).record(duration.as_secs_f64());
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_requests_are_rendered() {
        let handle = init_metrics().expect("recorder installed");
        for _ in 0..3 {
            record_request("GET", "/metrics-unit", 200, Duration::from_millis(12));
        }
        record_request("GET", "/metrics-unit", 404, Duration::from_millis(1));

        let rendered = handle.render();
        let counter = |status: &str| {
            rendered
                .lines()
                .find(|l| {
                    l.starts_with("http_total_requests{")
                        && l.contains(r#"route="/metrics-unit""#)
                        && l.contains(&format!(r#"status="{}""#, status))
                })
                .map(|l| l.rsplit(' ').next().unwrap_or_default().to_string())
        };

        assert_eq!(counter("200").as_deref(), Some("3"));
        assert_eq!(counter("404").as_deref(), Some("1"));
        assert!(rendered.contains("http_duration_seconds_bucket{"));
    }

    #[test]
    fn init_is_idempotent() {
        assert!(init_metrics().is_some());
        assert!(init_metrics().is_some());
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → tracing.rs (request span, parent from `traceparent`)
//!     → http::middleware::observer (status, access log)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON log lines)
//!     → /metrics (Prometheus scrape)
//!     → OTLP collector (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the request span
//! - Metrics are cheap (atomic increments)
//! - Span export is optional; the service runs without a collector

pub mod logging;
pub mod metrics;
pub mod tracing;

use tracing_subscriber::util::TryInitError;

use crate::config::ObservabilityConfig;

/// Set up propagation, span export and the log subscriber.
///
/// A collector that cannot be reached at startup is logged and skipped.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    self::tracing::install_propagator();

    let (tracer, export_error) = match self::tracing::init_tracer(config) {
        Ok(tracer) => (tracer, None),
        Err(e) => (None, Some(e)),
    };
    let exporting = tracer.is_some();

    logging::init_subscriber(config, tracer)?;

    if let Some(e) = export_error {
        ::tracing::warn!(error = %e, "Cannot initialize OpenTelemetry tracing via gRPC");
    } else if exporting {
        ::tracing::info!(
            endpoint = config.otlp_endpoint.as_deref().unwrap_or_default(),
            service = %config.service_name,
            "Exporting spans over OTLP"
        );
    }
    Ok(())
}

//! Distributed tracing support.
//!
//! # Responsibilities
//! - Export spans over OTLP/gRPC when a collector endpoint is configured
//! - Extract W3C trace context from incoming requests
//! - Create the per-request span that every handler log lands in

use axum::{body::Body, http::HeaderMap, http::Request};
use opentelemetry::{
    global,
    propagation::Extractor,
    trace::{TraceError, TracerProvider as _},
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, runtime, trace, Resource};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::ObservabilityConfig;
use crate::http::request::request_id;

/// Register the W3C trace-context propagator.
pub fn install_propagator() {
    global::set_text_map_propagator(TraceContextPropagator::new());
}

/// Build the OTLP pipeline and register it as the global tracer provider.
///
/// Returns `Ok(None)` when no collector endpoint is configured.
pub fn init_tracer(config: &ObservabilityConfig) -> Result<Option<trace::Tracer>, TraceError> {
    let Some(endpoint) = config.otlp_endpoint.as_deref() else {
        return Ok(None);
    };
    let provider = build_provider(endpoint, &config.service_name)?;
    let tracer = provider.tracer(config.service_name.clone());
    global::set_tracer_provider(provider);
    Ok(Some(tracer))
}

fn build_provider(endpoint: &str, service_name: &str) -> Result<trace::TracerProvider, TraceError> {
    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(trace::Config::default().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}

/// Flush pending spans and stop the exporter.
pub async fn shutdown_tracer() {
    // The batch processor blocks while flushing.
    if let Err(e) = tokio::task::spawn_blocking(global::shutdown_tracer_provider).await {
        tracing::error!(error = %e, "cannot shutdown tracer");
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Remote parent context carried by the request headers, if any.
pub fn extract_remote_context(headers: &HeaderMap) -> opentelemetry::Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(headers)))
}

/// Span factory for `TraceLayer`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let id = request_id(request.headers());

    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %id,
        otel.kind = "server",
    );
    span.set_parent(extract_remote_context(request.headers()));
    span
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, observation, limits)
//! - Bind server to listener
//! - Graceful shutdown on the lifecycle signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TodoConfig;
use crate::database::TodoRepository;
use crate::http::{docs, handlers, middleware::observe_request};
use crate::lifecycle;
use crate::observability::{metrics, tracing::make_request_span};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TodoRepository>,
    pub metrics: Option<PrometheusHandle>,
}

/// HTTP server for the todo API.
pub struct HttpServer {
    router: Router,
    config: TodoConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(
        config: TodoConfig,
        repository: Arc<dyn TodoRepository>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState { repository, metrics };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &TodoConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route(
                "/api/v1/todos",
                post(handlers::add_todo).get(handlers::get_todos),
            )
            .route(
                "/api/v1/todos/{id}",
                get(handlers::get_todo)
                    .put(handlers::update_todo)
                    .delete(handlers::delete_todo),
            )
            .merge(docs::router());

        if state.metrics.is_some() {
            router = router.route("/metrics", get(metrics::metrics_handler));
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(observe_request))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                lifecycle::shutdown::wait(shutdown).await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

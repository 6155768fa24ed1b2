//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the repository and bring its schema up to date
//! - Install the metrics recorder
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: a store that cannot be initialized is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;

use crate::config::TodoConfig;
use crate::database::{self, RepositoryError, TodoRepository};
use crate::observability::metrics;

/// Error raised while bringing the service up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot initialize store: {0}")]
    Repository(#[from] RepositoryError),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Long-lived dependencies handed to the HTTP server.
pub struct Services {
    pub repository: Arc<dyn TodoRepository>,
    pub metrics: Option<PrometheusHandle>,
}

/// Initialize the store and metrics, in that order.
pub async fn init_services(config: &TodoConfig) -> Result<Services, StartupError> {
    let repository = database::from_config(&config.database);
    repository.init().await?;
    tracing::info!(
        backend = ?config.database.backend,
        host = %config.database.host,
        database = %config.database.name,
        "Store initialized"
    );

    let metrics = if config.observability.metrics_enabled {
        let handle = metrics::init_metrics();
        if let Some(handle) = &handle {
            metrics::spawn_upkeep(handle.clone());
        }
        handle
    } else {
        None
    };

    Ok(Services { repository, metrics })
}

/// Bind the API listener.
pub async fn bind(config: &TodoConfig) -> Result<TcpListener, StartupError> {
    let address = &config.listener.bind_address;
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;

    #[tokio::test]
    async fn memory_backend_starts_without_database() {
        let mut config = TodoConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.observability.metrics_enabled = false;

        let services = init_services(&config).await.unwrap();
        assert!(services.metrics.is_none());
        assert!(services.repository.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bind_reports_address_on_failure() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = TodoConfig::default();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = bind(&config).await.unwrap_err();
        assert!(err.to_string().contains(&config.listener.bind_address));
    }
}

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (TodoConfig::default)
//!     → config file (TOML, optional)
//!     → environment (API_LISTEN, POSTGRES_*, OTEL_*)
//!     → validation.rs (semantic checks)
//!     → TodoConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    DatabaseConfig, ListenerConfig, LogFormat, ObservabilityConfig, StorageBackend, TodoConfig,
};

//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::TodoConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then process environment, then validation.
pub fn resolve_config(path: Option<&Path>) -> Result<TodoConfig, ConfigError> {
    load_config(path, |key| std::env::var(key).ok())
}

/// Same as [`resolve_config`] with environment lookups served by `lookup`.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<TodoConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => TodoConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so overrides can be tested without
/// touching process state.
pub fn apply_env_overrides<F>(config: &mut TodoConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup("API_LISTEN") {
        // ":8080" means every interface.
        config.listener.bind_address = if addr.starts_with(':') {
            format!("0.0.0.0{}", addr)
        } else {
            addr
        };
    }
    if let Some(host) = lookup("POSTGRES_HOST") {
        config.database.host = host;
    }
    if let Some(port) = lookup("POSTGRES_PORT") {
        config.database.port = port.parse().map_err(|_| ConfigError::Env {
            key: "POSTGRES_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(name) = lookup("POSTGRES_DB") {
        config.database.name = name;
    }
    if let Some(user) = lookup("POSTGRES_USER") {
        config.database.user = user;
    }
    if let Some(password) = lookup("POSTGRES_PASSWORD") {
        config.database.password = password;
    }
    if let Some(endpoint) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.observability.otlp_endpoint = Some(endpoint).filter(|e| !e.is_empty());
    }
    if let Some(service) = lookup("OTEL_SERVICE_NAME") {
        config.observability.service_name = service;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogFormat, StorageBackend};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_partial_toml() {
        let config: TodoConfig = toml::from_str(
            r#"
            [database]
            backend = "memory"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn env_overrides_database_and_listener() {
        let mut config = TodoConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("API_LISTEN", ":9000"),
                ("POSTGRES_HOST", "db.internal"),
                ("POSTGRES_PORT", "6543"),
                ("POSTGRES_DB", "tasks"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.name, "tasks");
        assert_eq!(config.database.user, "postgres");
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = TodoConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("POSTGRES_PORT", "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "POSTGRES_PORT", .. }));
    }

    #[test]
    fn empty_otlp_endpoint_disables_export() {
        let mut config = TodoConfig::default();
        config.observability.otlp_endpoint = Some("http://collector:4317".into());
        apply_env_overrides(&mut config, env(&[("OTEL_EXPORTER_OTLP_ENDPOINT", "")])).unwrap();
        assert!(config.observability.otlp_endpoint.is_none());
    }

    #[test]
    fn load_config_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("todo-api-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config(Some(&path), env(&[])).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
    }

    #[test]
    fn environment_wins_over_file() {
        let path = std::env::temp_dir().join(format!("todo-api-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:7000\"\n").unwrap();

        let config = load_config(Some(&path), env(&[("API_LISTEN", "localhost:9000")])).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config.listener.bind_address, "localhost:9000");
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("todo-api-{}.toml", uuid::Uuid::new_v4()));
        let err = load_config(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

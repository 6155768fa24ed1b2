//! Todo API Library

pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;

pub use config::schema::TodoConfig;
pub use database::TodoRepository;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

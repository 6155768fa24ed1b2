//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, `{id}` validation)
//!     → middleware/observer.rs (status, access log, metrics)
//!     → handlers.rs (todo CRUD) / docs.rs (OpenAPI)
//!     → response.rs (ApiError → status + plain-text body)
//!     → Send to client
//! ```

pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{TodoId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};

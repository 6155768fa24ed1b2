//! Middleware wrapped around the API router.

pub mod observer;

pub use observer::{observe_request, RequestRecord};

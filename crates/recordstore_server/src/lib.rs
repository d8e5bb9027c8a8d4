//! HTTP surface of the record store service.
//!
//! # Responsibility
//! - Map JSON-over-HTTP requests onto `recordstore_core` use-cases.
//! - Own process startup: configuration, logging, storage bootstrap, serving.

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;

pub use config::{Args, ServerConfig};
pub use errors::{ApiError, ApiResult};
pub use server::{run, HttpServer, ServeError};

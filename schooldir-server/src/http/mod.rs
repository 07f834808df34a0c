//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON envelope on every response

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, UploadError};
pub use server::{build_router, run_server, ServerConfig, ServerError};

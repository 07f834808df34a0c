//! schooldir-server: HTTP service for the school directory
//!
//! Registers schools (with an optional image) and lists them newest first.
//! Records live in a single MySQL table that is provisioned on demand;
//! images go to Cloudinary or to a local, web-served directory.

pub mod config;
pub mod db;
pub mod http;
pub mod media;
pub mod models;
pub mod service;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, DbConfig, MediaConfig};
pub use http::{build_router, run_server, ServerConfig};
pub use service::{SchoolService, ServiceError};
pub use state::AppState;

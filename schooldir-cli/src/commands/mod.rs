//! Subcommand implementations

pub mod migrate;
pub mod seed;
pub mod serve;

use std::sync::Arc;

use anyhow::{Context, Result};
use schooldir_server::db::{Database, MySqlSchoolRepo};
use schooldir_server::DbConfig;

/// School repository over the configured database
pub(crate) fn repo_from_env() -> Result<MySqlSchoolRepo> {
    let config = DbConfig::from_env().context("Invalid database configuration")?;
    Ok(MySqlSchoolRepo::new(Arc::new(Database::new(config))))
}

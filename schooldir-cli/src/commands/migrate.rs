//! Provision the database and the schools table

use anyhow::{Context, Result};
use schooldir_server::db::SchoolStore;

use super::repo_from_env;

/// Create the database (if missing) and the schools table
pub async fn run_migrate() -> Result<()> {
    let repo = repo_from_env()?;
    let database = &repo.database().config().database;

    repo.ensure_schema()
        .await
        .with_context(|| format!("Failed to provision database '{}'", database))?;

    tracing::info!(database = %database, "Schema ready");
    repo.database().close().await;
    Ok(())
}

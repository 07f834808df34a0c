//! HTTP server command
//!
//! Runs the school directory API. The database pool is opened lazily;
//! the schools table is prepared at startup unless `--lazy-schema` is set.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use schooldir_server::db::Database;
use schooldir_server::{media, run_server, AppState, DbConfig, MediaConfig, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "SCHOOLDIR_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory served as static files (local images are stored below it)
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Don't create the schools table at startup; wait for the first insert
    #[arg(long)]
    pub lazy_schema: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = DbConfig::from_env().context("Invalid database configuration")?;
    let media_config = MediaConfig::from_env().context("Invalid media configuration")?;
    let (config, media_config) = resolve(&args, media_config);

    tracing::info!(
        host = %db_config.host,
        database = %db_config.database,
        tls = db_config.tls.is_some(),
        "Database configured"
    );

    let database = Arc::new(Database::new(db_config));
    let media = media::from_config(media_config);
    tracing::info!(media = media.name(), "Media store configured");

    let state = AppState::mysql(database.clone(), media);

    if !args.lazy_schema {
        if let Err(err) = state.service().ensure_schema().await {
            // The insert path creates the table on demand
            tracing::warn!(error = %err, "Could not prepare schema at startup");
        }
    }

    tracing::info!("Starting schooldir server on {}", args.bind);
    run_server(state, config).await.context("Server error")?;

    database.close().await;
    Ok(())
}

/// Server and media settings sharing one public directory
fn resolve(args: &ServeArgs, media: MediaConfig) -> (ServerConfig, MediaConfig) {
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        public_dir: Some(args.public_dir.clone()),
    };
    (config, media.with_public_dir(args.public_dir.clone()))
}

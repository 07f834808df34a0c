//! schooldir CLI - School directory service
//!
//! - `serve`: run the HTTP API
//! - `migrate`: create the database and schools table
//! - `seed`: load sample schools

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::seed::SeedArgs;
use commands::serve::ServeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "schooldir",
    author,
    version,
    about = "School directory: register schools and list them"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Environment file to load (default: .env in the working directory)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Create the database and the schools table if missing
    Migrate,

    /// Replace the table contents with sample schools
    Seed(SeedArgs),
}

/// Load variables from an env file; existing variables win
fn load_env(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        None => {
            // .env is optional
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_env(cli.env_file.as_deref())?;
    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Migrate => commands::migrate::run_migrate().await,
        Commands::Seed(args) => commands::seed::run_seed(args).await,
    }
}

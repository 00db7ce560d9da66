//! `job-tracker` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`  — start the API server.
//! - `init`   — create the database file and schema.
//! - `import` — bulk-load jobs from a JSON file.
//! - `stats`  — print aggregate counts.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use db::models::NewJob;
use db::pool::DEFAULT_DATABASE_PATH;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "job-tracker",
    about = "Personal job-application tracker",
    version
)]
struct Cli {
    /// Path of the SQLite database file. Its directory is created on demand.
    #[arg(long, global = true, env = "JOB_TRACKER_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Maximum number of pooled database connections.
    #[arg(long, global = true, env = "JOB_TRACKER_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "JOB_TRACKER_BIND", default_value = "127.0.0.1:3000")]
        bind: String,
    },
    /// Create the database file and schema, then exit.
    Init,
    /// Bulk-create jobs from a JSON file holding an array of jobs.
    Import {
        /// Path to the JSON file.
        path: PathBuf,
    },
    /// Print job counts as JSON.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let pool = db::pool::create_pool(&cli.database, cli.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", cli.database.display()))?;

    match cli.command {
        Command::Serve { bind } => {
            info!("Starting API server on {bind}");
            api::serve(&bind, pool.clone())
                .await
                .context("server error")?;
        }
        Command::Init => {
            info!("Database ready at {}", cli.database.display());
        }
        Command::Import { path } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read file {}", path.display()))?;

            let value: serde_json::Value =
                serde_json::from_str(&content).context("invalid JSON")?;
            if !value.is_array() {
                bail!("expected an array of jobs in {}", path.display());
            }
            let jobs: Vec<NewJob> = serde_json::from_value(value).context("invalid job")?;

            let inserted = db::repository::jobs::create_jobs(&pool, &jobs)
                .await
                .context("import failed")?;
            println!("Added {} jobs", inserted.len());
        }
        Command::Stats => {
            let stats = db::repository::stats::job_stats(&pool)
                .await
                .context("failed to compute stats")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    pool.close().await;
    Ok(())
}

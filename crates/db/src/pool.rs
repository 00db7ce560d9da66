//! SQLite connection pool.
//!
//! The pool is built once at process start and handed to the router and the
//! repository functions; nothing in this crate holds it globally.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{schema::SCHEMA, DbError};

/// Type alias for the shared SQLite pool used across the whole application.
pub type DbPool = SqlitePool;

/// Location of the database file when none is configured.
pub const DEFAULT_DATABASE_PATH: &str = "data/jobs.db";

/// Open (creating if needed) the database file at `path` and make sure the
/// schema exists.
///
/// The containing directory is created when absent. `max_connections`
/// controls the pool ceiling.
pub async fn create_pool(path: &Path, max_connections: u32) -> Result<DbPool, DbError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            debug!("Creating data directory {}", dir.display());
            std::fs::create_dir_all(dir)?;
        }
    }

    info!(
        "Opening database {} (max_connections={})",
        path.display(),
        max_connections
    );
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Apply the table and index definitions. Safe to run any number of times.
pub async fn init_schema(pool: &DbPool) -> Result<(), DbError> {
    debug!("Ensuring database schema");
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Round-trip a trivial query; used by the health probe.
pub async fn ping(pool: &DbPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

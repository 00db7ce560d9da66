//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The data directory or database file could not be created.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row not found")]
    NotFound,

    /// The caller supplied something the repository cannot act on
    /// (an empty batch, no usable ids, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

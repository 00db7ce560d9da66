//! `db` crate — pure persistence layer.
//!
//! Provides the SQLite pool and schema, typed row structs, and repository
//! functions for the `jobs` and `apply_links` tables.

pub mod error;
pub mod models;
pub mod pool;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use pool::DbPool;

//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No HTTP concerns live here.

pub mod jobs;
pub mod stats;

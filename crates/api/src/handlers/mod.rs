//! Route handlers, grouped by resource.

pub mod jobs;
pub mod probes;
pub mod stats;

use super::AppState;

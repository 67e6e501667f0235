//! External Collaborators
//!
//! Persistence and statistics sinks the core writes to but never depends on.
//! Every failure here is logged and absorbed by the caller; gameplay never
//! waits on or fails because of a store.
//!
//! ## Module Structure
//!
//! - `progress`: per-(domain, seed) saved game state
//! - `stats`: fire-and-forget guess statistics
//! - `hidden`: category ids excluded from daily generation

pub mod progress;
pub mod stats;
pub mod hidden;

use thiserror::Error;

pub use progress::{MemoryProgressStore, ProgressStore, progress_key};
pub use stats::{
    CardTally, CellStats, DayStats, GuessRecord, MemoryStatsSink, StatsSink,
    spawn_stats_forwarder, stats_key,
};
pub use hidden::{HiddenCategories, StaticHiddenCategories};

/// Failures reported by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Stored text could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Stored state decoded but breaks the board invariants.
    #[error("Corrupt saved state under {0}")]
    Corrupt(String),

    /// Backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

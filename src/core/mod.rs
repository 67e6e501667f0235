//! Core deterministic primitives.
//!
//! Everything that decides which puzzle a day gets lives here: the seed
//! derivation, the shuffle and the state fingerprint.

pub mod rng;
pub mod seed;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, ShuffleStrategy, seeded_shuffle};
pub use seed::{daily_seed, date_key, today_utc};
pub use hash::{StateHash, StateHasher, compute_state_hash};

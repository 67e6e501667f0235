//! # TCGDoku
//!
//! Deterministic daily 3x3 category-grid puzzles for card and skill games.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         TCGDOKU                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Xorshift128+ and legacy sine shuffles     │
//! │  ├── seed.rs     - UTC date → daily seed                     │
//! │  └── hash.rs     - Board and puzzle fingerprints             │
//! │                                                              │
//! │  category/       - Category data and the adapter boundary    │
//! │  domains/        - MTG, Flesh and Blood, Gymnastics          │
//! │                                                              │
//! │  puzzle/         - Puzzle search and custom validation       │
//! │  game/           - Guess state machine (deterministic)       │
//! │                                                              │
//! │  store/          - Progress, stats, hidden categories        │
//! │  service.rs      - Daily puzzle cache and session factory    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! For a fixed domain, category pool, exclusion list and date, the generated
//! puzzle is identical on every run and every platform:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - All randomness from a seed derived from the UTC date
//! - Guess evaluation depends only on (entity, category)
//!
//! Replaying a recorded guess sequence therefore always lands on the same
//! board.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod category;
pub mod domains;
pub mod puzzle;
pub mod game;
pub mod store;
pub mod config;
pub mod service;

// Re-export commonly used types
pub use core::rng::{DeterministicRng, ShuffleStrategy};
pub use category::{Category, CategoryAdapter, CategoryId, Domain};
pub use puzzle::{Puzzle, PuzzleGenerator, PuzzleIds};
pub use game::{Cell, GameState, GameStatus, PlayerSession};
pub use config::AppConfig;
pub use service::DailyPuzzleService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows and columns per grid
pub const GRID_SIZE: usize = 3;

/// Cells per grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Guesses allowed per puzzle
pub const MAX_GUESSES: u8 = 9;

/// Reshuffles tried before falling back to the hand-picked puzzle
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

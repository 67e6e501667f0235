//! Game Logic Module
//!
//! The per-player guess state machine. Board transitions are synchronous and
//! deterministic; adapter calls happen only inside session evaluation.
//!
//! ## Module Structure
//!
//! - `state`: Cells, board state, whole-board status
//! - `session`: Guess lifecycle with stale-result protection
//! - `events`: Game events for replay and the UI
//! - `replay`: Re-applying recorded guesses

pub mod state;
pub mod session;
pub mod events;
pub mod replay;

// Re-export key types
pub use state::{Cell, GameState, GameStatus, GuessedEntity};
pub use session::{
    evaluate, EvaluatedGuess, Evaluation, GuessOutcome, PendingGuess, PlayerSession,
    SessionConfig, SessionError, BYPASS_TOKENS,
};
pub use events::{GameEvent, GameEventData, RejectReason};
pub use replay::{replay_guesses, RecordedGuess};

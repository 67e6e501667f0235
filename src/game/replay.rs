//! Guess Replay
//!
//! Re-applies a recorded `(cell, text)` sequence to a fresh board. Guess
//! evaluation depends only on (entity, category), so the same sequence
//! against the same puzzle always lands on the same board.

use std::sync::Arc;

use tracing::debug;

use crate::category::CategoryAdapter;
use crate::game::session::{PlayerSession, SessionConfig};
use crate::game::state::GameState;
use crate::puzzle::Puzzle;

/// One recorded guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedGuess {
    /// Board index the player selected
    pub cell: u8,
    /// Text the player submitted
    pub input: String,
}

impl RecordedGuess {
    /// Create a recorded guess.
    pub fn new(cell: u8, input: impl Into<String>) -> Self {
        Self { cell, input: input.into() }
    }
}

/// Replay `guesses` on an empty board and return the final state.
///
/// Guesses the live session would refuse (filled cell, unknown entity, reuse,
/// game already over) are skipped exactly as they were refused live.
pub async fn replay_guesses<A>(
    adapter: &A,
    puzzle: &Puzzle,
    guesses: &[RecordedGuess],
    config: SessionConfig,
) -> GameState
where
    A: CategoryAdapter + ?Sized,
{
    let mut session = PlayerSession::new(adapter.domain(), 0, "", Arc::new(puzzle.clone()), config);

    for (i, guess) in guesses.iter().enumerate() {
        if session.state().selected_cell.map(|c| c.index()) != Some(guess.cell) {
            if let Err(e) = session.select_cell(guess.cell) {
                debug!("Replay step {} skipped: {}", i, e);
                continue;
            }
        }
        if let Err(e) = session.submit_guess(adapter, &guess.input).await {
            debug!("Replay step {} rejected: {}", i, e);
        }
    }

    session.state().clone()
}

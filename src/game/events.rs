//! Game Events
//!
//! Events emitted by a player session for replay and the UI layer.

use serde::{Serialize, Deserialize};
use crate::game::state::Cell;

/// Why a guess was turned away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Nothing in the domain matched the input; no guess consumed
    NotFound,
    /// Entity already on the board; no guess consumed
    AlreadyUsed,
    /// Entity failed a category; one guess consumed
    Mismatch {
        /// Label of the first category that failed, row before column
        category: String,
    },
}

impl RejectReason {
    /// Did this rejection count against the guess budget?
    pub fn consumes_guess(&self) -> bool {
        matches!(self, RejectReason::Mismatch { .. })
    }
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player selected an empty cell
    CellSelected {
        /// Selected cell
        cell: Cell,
    },

    /// Entity placed on the board
    GuessAccepted {
        /// Cell the entity now occupies
        cell: Cell,
        /// Canonical entity name
        entity: String,
        /// Score after placement
        score: u8,
    },

    /// Guess turned away
    GuessRejected {
        /// Cell the guess targeted
        cell: Cell,
        /// Raw player input
        input: String,
        /// Why it was rejected
        reason: RejectReason,
    },

    /// All nine cells filled
    GameWon {
        /// Guesses used to finish
        guesses: u8,
    },

    /// Budget spent with empty cells left
    GameLost {
        /// Cells filled when the budget ran out
        score: u8,
    },
}

/// A game event stamped with the guess count it followed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Guesses made when the event occurred
    pub guesses: u8,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(guesses: u8, data: GameEventData) -> Self {
        Self { guesses, data }
    }

    /// Create cell selected event.
    pub fn cell_selected(guesses: u8, cell: Cell) -> Self {
        Self::new(guesses, GameEventData::CellSelected { cell })
    }

    /// Create guess accepted event.
    pub fn guess_accepted(guesses: u8, cell: Cell, entity: String, score: u8) -> Self {
        Self::new(guesses, GameEventData::GuessAccepted { cell, entity, score })
    }

    /// Create guess rejected event.
    pub fn guess_rejected(guesses: u8, cell: Cell, input: String, reason: RejectReason) -> Self {
        Self::new(guesses, GameEventData::GuessRejected { cell, input, reason })
    }

    /// Create game won event.
    pub fn game_won(guesses: u8) -> Self {
        Self::new(guesses, GameEventData::GameWon { guesses })
    }

    /// Create game lost event.
    pub fn game_lost(guesses: u8, score: u8) -> Self {
        Self::new(guesses, GameEventData::GameLost { score })
    }

    /// Cell this event concerns, if any.
    pub fn cell(&self) -> Option<Cell> {
        match &self.data {
            GameEventData::CellSelected { cell }
            | GameEventData::GuessAccepted { cell, .. }
            | GameEventData::GuessRejected { cell, .. } => Some(*cell),
            GameEventData::GameWon { .. } | GameEventData::GameLost { .. } => None,
        }
    }

    /// Does this event end the game?
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::GameWon { .. } | GameEventData::GameLost { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cell() {
        let cell = Cell::new(3).unwrap();
        assert_eq!(GameEvent::cell_selected(0, cell).cell(), Some(cell));
        assert_eq!(GameEvent::game_won(9).cell(), None);
        assert!(GameEvent::game_lost(9, 4).is_terminal());
    }

    #[test]
    fn test_only_mismatch_consumes_guess() {
        assert!(!RejectReason::NotFound.consumes_guess());
        assert!(!RejectReason::AlreadyUsed.consumes_guess());
        assert!(RejectReason::Mismatch { category: "Red".into() }.consumes_guess());
    }
}

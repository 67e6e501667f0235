//! Game State Definitions
//!
//! Per-player board state layered on a fixed [`Puzzle`](crate::puzzle::Puzzle).
//! Transitions here are synchronous and pure; everything that touches an
//! adapter lives in [`session`](super::session).

use std::collections::BTreeSet;
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::session::SessionError;
use crate::{CELL_COUNT, GRID_SIZE, MAX_GUESSES};

// =============================================================================
// CELL
// =============================================================================

/// Board position 0-8, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cell(u8);

impl Cell {
    /// Create from a board index, `None` if out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CELL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Create from row and column.
    pub fn at(row: usize, col: usize) -> Option<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self((row * GRID_SIZE + col) as u8))
        } else {
            None
        }
    }

    /// Board index 0-8.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Row 0-2.
    #[inline]
    pub fn row(self) -> usize {
        self.0 as usize / GRID_SIZE
    }

    /// Column 0-2.
    #[inline]
    pub fn col(self) -> usize {
        self.0 as usize % GRID_SIZE
    }

    /// All nine cells in board order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT as u8).map(Cell)
    }
}

impl TryFrom<u8> for Cell {
    type Error = SessionError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Cell::new(index).ok_or(SessionError::InvalidCell(index))
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// BOARD
// =============================================================================

/// An entity placed on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessedEntity {
    /// Display name as resolved
    pub name: String,
}

/// Whole-board status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Guesses remain and the board is not full
    InProgress,
    /// All nine cells filled
    Won,
    /// Guess budget spent with empty cells left
    Lost,
}

impl GameStatus {
    /// Won or lost.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// One player's progress on one day's puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Filled cells
    pub board: [Option<GuessedEntity>; CELL_COUNT],
    /// Guesses made, correct or not
    pub guesses: u8,
    /// Correct guesses
    pub score: u8,
    /// Cell the player is guessing for
    pub selected_cell: Option<Cell>,
    /// Normalised names already placed on the board
    pub used_entity_names: BTreeSet<String>,
    /// Set once won or lost; never cleared
    pub game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh, empty board.
    pub fn new() -> Self {
        Self {
            board: Default::default(),
            guesses: 0,
            score: 0,
            selected_cell: None,
            used_entity_names: BTreeSet::new(),
            game_over: false,
        }
    }

    /// Current whole-board status.
    pub fn status(&self) -> GameStatus {
        if self.score as usize == CELL_COUNT {
            GameStatus::Won
        } else if self.game_over {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// Guesses left before the game is lost.
    pub fn guesses_remaining(&self) -> u8 {
        MAX_GUESSES.saturating_sub(self.guesses)
    }

    /// Entity placed in `cell`, if any.
    pub fn entity_at(&self, cell: Cell) -> Option<&GuessedEntity> {
        self.board[cell.index() as usize].as_ref()
    }

    /// Has this normalised name already been placed?
    pub fn is_used(&self, key: &str) -> bool {
        self.used_entity_names.contains(key)
    }

    /// Select an empty cell while the game is running.
    pub fn select_cell(&mut self, cell: Cell) -> Result<(), SessionError> {
        if self.game_over {
            return Err(SessionError::GameOver);
        }
        if self.entity_at(cell).is_some() {
            return Err(SessionError::CellFilled(cell.index()));
        }
        self.selected_cell = Some(cell);
        Ok(())
    }

    /// Drop the current selection.
    pub fn clear_selection(&mut self) {
        self.selected_cell = None;
    }

    /// Place a correct guess in `cell`.
    pub(crate) fn record_correct(&mut self, cell: Cell, name: String, key: String) {
        self.guesses += 1;
        self.score += 1;
        self.used_entity_names.insert(key);
        self.board[cell.index() as usize] = Some(GuessedEntity { name });
        self.selected_cell = None;
        self.game_over = self.score as usize == CELL_COUNT || self.guesses >= MAX_GUESSES;
    }

    /// Count a wrong guess. The selection survives unless the budget is spent.
    pub(crate) fn record_wrong(&mut self) {
        self.guesses += 1;
        if self.guesses >= MAX_GUESSES {
            self.game_over = true;
            self.selected_cell = None;
        }
    }

    /// Check the board invariants; used after loading untrusted progress.
    pub fn check_invariants(&self) -> bool {
        let filled = self.board.iter().filter(|slot| slot.is_some()).count();
        let over_expected = filled == CELL_COUNT || self.guesses >= MAX_GUESSES;

        self.guesses <= MAX_GUESSES
            && self.score <= self.guesses
            && self.score as usize == filled
            && self.used_entity_names.len() == filled
            && self.game_over == over_expected
            && self.selected_cell.map_or(true, |c| !self.game_over && self.entity_at(c).is_none())
    }

    /// Fingerprint of the board for replay comparison.
    ///
    /// Selection is excluded: it is UI state, not progress.
    pub fn compute_hash(&self, seed: u64) -> StateHash {
        compute_state_hash(seed, |hasher| {
            for slot in &self.board {
                match slot {
                    Some(entity) => {
                        hasher.update_bool(true);
                        hasher.update_str(&entity.name);
                    }
                    None => hasher.update_bool(false),
                }
            }
            hasher.update_u8(self.guesses);
            hasher.update_u8(self.score);
            for name in &self.used_entity_names {
                hasher.update_str(name);
            }
            hasher.update_bool(self.game_over);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cell(i: u8) -> Cell {
        Cell::new(i).unwrap()
    }

    #[test]
    fn test_cell_geometry() {
        assert_eq!(cell(4).row(), 1);
        assert_eq!(cell(4).col(), 1);
        assert_eq!(cell(7).row(), 2);
        assert_eq!(cell(7).col(), 1);
        assert_eq!(Cell::at(2, 2), Some(cell(8)));
        assert!(Cell::new(9).is_none());
        assert!(Cell::at(3, 0).is_none());
    }

    #[test]
    fn test_cell_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&cell(5)).unwrap(), "5");
        assert!(serde_json::from_str::<Cell>("9").is_err());
    }

    #[test]
    fn test_correct_guess_fills_cell() {
        let mut state = GameState::new();
        state.select_cell(cell(4)).unwrap();
        state.record_correct(cell(4), "Serra Angel".into(), "serra angel".into());

        assert_eq!(state.entity_at(cell(4)).unwrap().name, "Serra Angel");
        assert_eq!((state.guesses, state.score), (1, 1));
        assert_eq!(state.selected_cell, None);
        assert!(state.is_used("serra angel"));
        assert!(state.check_invariants());
    }

    #[test]
    fn test_wrong_guess_keeps_selection() {
        let mut state = GameState::new();
        state.select_cell(cell(2)).unwrap();
        state.record_wrong();
        assert_eq!(state.selected_cell, Some(cell(2)));
        assert_eq!((state.guesses, state.score), (1, 0));
    }

    #[test]
    fn test_ninth_wrong_guess_loses() {
        let mut state = GameState::new();
        state.select_cell(cell(0)).unwrap();
        for _ in 0..9 {
            state.record_wrong();
        }
        assert!(state.game_over);
        assert_eq!(state.status(), GameStatus::Lost);
        assert_eq!(state.selected_cell, None);
        assert_eq!(state.select_cell(cell(1)), Err(SessionError::GameOver));
    }

    #[test]
    fn test_filled_cell_cannot_be_selected() {
        let mut state = GameState::new();
        state.record_correct(cell(3), "Bolt".into(), "bolt".into());
        assert_eq!(state.select_cell(cell(3)), Err(SessionError::CellFilled(3)));
    }

    #[test]
    fn test_hash_ignores_selection() {
        let mut a = GameState::new();
        let b = GameState::new();
        a.select_cell(cell(1)).unwrap();
        assert_eq!(a.compute_hash(1), b.compute_hash(1));
        assert_ne!(a.compute_hash(1), a.compute_hash(2));
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let mut state = GameState::new();
        state.record_correct(cell(0), "Llanowar Elves".into(), "llanowar elves".into());
        state.select_cell(cell(8)).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"usedEntityNames\""));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Select(u8),
        Correct,
        Wrong,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..9).prop_map(Op::Select),
            Just(Op::Correct),
            Just(Op::Wrong),
        ]
    }

    /// Drive the state the way a session does: guesses only with a selection
    /// on a running game.
    fn apply(state: &mut GameState, op: &Op, counter: &mut u32) {
        match *op {
            Op::Select(i) => {
                let _ = state.select_cell(cell(i));
            }
            Op::Correct | Op::Wrong if state.game_over => {}
            Op::Correct => {
                if let Some(c) = state.selected_cell {
                    *counter += 1;
                    state.record_correct(c, format!("Card {counter}"), format!("card {counter}"));
                }
            }
            Op::Wrong => {
                if state.selected_cell.is_some() {
                    state.record_wrong();
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_budget_and_win_invariants(ops in prop::collection::vec(op(), 0..60)) {
            let mut state = GameState::new();
            let mut counter = 0;
            for op in &ops {
                apply(&mut state, op, &mut counter);
                prop_assert!(state.score <= state.guesses);
                prop_assert!(state.guesses <= MAX_GUESSES);
                let full = state.board.iter().all(|s| s.is_some());
                prop_assert_eq!(state.score as usize == CELL_COUNT, full);
                if full {
                    prop_assert!(state.game_over);
                }
                prop_assert!(state.check_invariants());
            }
        }

        #[test]
        fn prop_game_over_is_terminal(ops in prop::collection::vec(op(), 0..40)) {
            let mut state = GameState::new();
            let mut counter = 0;
            state.select_cell(cell(0)).unwrap();
            for _ in 0..9 {
                state.record_wrong();
            }
            let frozen = state.clone();
            for op in &ops {
                apply(&mut state, op, &mut counter);
            }
            prop_assert_eq!(state, frozen);
        }
    }
}

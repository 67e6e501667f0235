//! Puzzle Definitions
//!
//! A [`Puzzle`] is the day's fixed assignment of three row and three column
//! categories. It is created once per (domain, day) and never mutated.
//! Persisted puzzles travel as [`PuzzleIds`] and are rehydrated against the
//! domain's registry.

pub mod generator;
pub mod validate;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::category::{Category, CategoryId};
use crate::core::hash::{StateHash, StateHasher};
use crate::game::state::Cell;
use crate::GRID_SIZE;

pub use generator::{GeneratedPuzzle, GeneratorConfig, PuzzleGenerator, PuzzleSource, check_pair};
pub use validate::{build_custom_puzzle, unsolvable_cells, validate_custom_puzzle};

/// Errors from assembling or rehydrating a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Id is not registered for the domain.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The same category appears in more than one slot.
    #[error("Category used more than once: {0}")]
    DuplicateCategory(CategoryId),

    /// Some cells have no entity satisfying both categories.
    #[error("Unsolvable cells: {0:?}")]
    Unsolvable(Vec<u8>),
}

/// Three row categories and three column categories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    /// Row categories, top to bottom
    pub rows: [Category; GRID_SIZE],
    /// Column categories, left to right
    pub cols: [Category; GRID_SIZE],
}

impl Puzzle {
    /// Create a puzzle from its two axes.
    pub fn new(rows: [Category; GRID_SIZE], cols: [Category; GRID_SIZE]) -> Self {
        Self { rows, cols }
    }

    /// Row category governing `cell`.
    pub fn row_category(&self, cell: Cell) -> &Category {
        &self.rows[cell.row()]
    }

    /// Column category governing `cell`.
    pub fn col_category(&self, cell: Cell) -> &Category {
        &self.cols[cell.col()]
    }

    /// All nine (cell, row, column) intersections in cell order.
    pub fn intersections(&self) -> impl Iterator<Item = (Cell, &Category, &Category)> + '_ {
        Cell::all().map(move |cell| (cell, self.row_category(cell), self.col_category(cell)))
    }

    /// Id-only form for persistence.
    pub fn ids(&self) -> PuzzleIds {
        PuzzleIds {
            rows: self.rows.clone().map(|c| c.id),
            cols: self.cols.clone().map(|c| c.id),
        }
    }

    /// Stable fingerprint of the assignment (ids and order).
    pub fn fingerprint(&self) -> StateHash {
        let mut hasher = StateHasher::for_puzzle();
        for cat in self.rows.iter().chain(self.cols.iter()) {
            hasher.update_str(cat.id.as_str());
        }
        hasher.finalize()
    }
}

/// Persistable puzzle: category ids only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleIds {
    /// Row category ids
    pub rows: [CategoryId; GRID_SIZE],
    /// Column category ids
    pub cols: [CategoryId; GRID_SIZE],
}

impl PuzzleIds {
    /// Build from string ids.
    pub fn new(rows: [&str; GRID_SIZE], cols: [&str; GRID_SIZE]) -> Self {
        Self {
            rows: rows.map(CategoryId::new),
            cols: cols.map(CategoryId::new),
        }
    }

    /// Rehydrate through a category lookup.
    pub fn rehydrate<F>(&self, lookup: F) -> Result<Puzzle, PuzzleError>
    where
        F: Fn(&CategoryId) -> Option<Category>,
    {
        let resolve = |id: &CategoryId| {
            lookup(id).ok_or_else(|| PuzzleError::UnknownCategory(id.clone()))
        };

        let [r0, r1, r2] = &self.rows;
        let [c0, c1, c2] = &self.cols;
        Ok(Puzzle::new(
            [resolve(r0)?, resolve(r1)?, resolve(r2)?],
            [resolve(c0)?, resolve(c1)?, resolve(c2)?],
        ))
    }
}

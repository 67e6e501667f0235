//! Custom Puzzle Validation
//!
//! Community puzzles are hand-assembled from category ids instead of being
//! generated. They get the same guarantees as generated ones: six distinct
//! known categories and nine satisfiable cells.

use std::collections::BTreeSet;
use std::time::Duration;

use futures_util::future::join_all;

use crate::category::CategoryAdapter;
use crate::puzzle::generator::check_pair;
use crate::puzzle::{Puzzle, PuzzleError, PuzzleIds};

/// Resolve ids against the adapter, rejecting unknown or repeated ids.
pub fn build_custom_puzzle<A>(adapter: &A, ids: &PuzzleIds) -> Result<Puzzle, PuzzleError>
where
    A: CategoryAdapter + ?Sized,
{
    let mut seen = BTreeSet::new();
    for id in ids.rows.iter().chain(ids.cols.iter()) {
        if !seen.insert(id) {
            return Err(PuzzleError::DuplicateCategory(id.clone()));
        }
    }
    ids.rehydrate(|id| adapter.category(id))
}

/// Cells (0-8) whose row/column pair fails the compatibility check.
pub async fn unsolvable_cells<A>(adapter: &A, puzzle: &Puzzle, limit: Duration) -> Vec<u8>
where
    A: CategoryAdapter + ?Sized,
{
    let checks = puzzle.intersections().map(|(cell, row, col)| async move {
        (cell, check_pair(adapter, row, col, limit).await)
    });

    join_all(checks)
        .await
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(cell, _)| cell.index())
        .collect()
}

/// Build and fully check a custom puzzle.
pub async fn validate_custom_puzzle<A>(
    adapter: &A,
    ids: &PuzzleIds,
    limit: Duration,
) -> Result<Puzzle, PuzzleError>
where
    A: CategoryAdapter + ?Sized,
{
    let puzzle = build_custom_puzzle(adapter, ids)?;
    let bad = unsolvable_cells(adapter, &puzzle, limit).await;
    if bad.is_empty() {
        Ok(puzzle)
    } else {
        Err(PuzzleError::Unsolvable(bad))
    }
}

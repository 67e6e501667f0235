//! Daily Puzzle Generator
//!
//! Picks three row and three column categories from a domain's pool so that
//! every row/column intersection has at least one answer.
//!
//! Each attempt reshuffles the pool with a seed mixed from the day seed and
//! the attempt number ([`attempt_seed`]), walks it greedily (no two rows and
//! no two columns may share a group), then checks the nine intersections
//! concurrently. The first attempt whose checks all pass wins.
//! When every attempt fails the adapter's fallback puzzle is returned, so
//! generation always terminates with a playable grid.

use std::collections::BTreeSet;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::category::{Category, CategoryAdapter, CategoryId};
use crate::core::rng::{attempt_seed, seeded_shuffle, ShuffleStrategy};
use crate::puzzle::Puzzle;
use crate::{DEFAULT_MAX_ATTEMPTS, GRID_SIZE};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Generator tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Reshuffles tried before falling back
    pub max_attempts: u32,
    /// Budget for a single compatibility check
    pub check_timeout: Duration,
    /// Permutation source
    pub shuffle: ShuffleStrategy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            check_timeout: Duration::from_secs(5),
            shuffle: ShuffleStrategy::default(),
        }
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Where a puzzle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PuzzleSource {
    /// Found by the search on the given (zero-based) attempt.
    Generated {
        /// Attempt that succeeded
        attempt: u32,
    },
    /// Search exhausted; the domain's hand-picked puzzle.
    Fallback,
}

/// A puzzle plus how it was produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    /// The grid assignment
    pub puzzle: Puzzle,
    /// Search or fallback
    pub source: PuzzleSource,
    /// Seed the search started from
    pub seed: u64,
}

// =============================================================================
// GENERATOR
// =============================================================================

/// Seeded puzzle search over one adapter.
pub struct PuzzleGenerator<'a, A> {
    adapter: &'a A,
    config: GeneratorConfig,
}

impl<'a, A: CategoryAdapter> PuzzleGenerator<'a, A> {
    /// Create a generator.
    pub fn new(adapter: &'a A, config: GeneratorConfig) -> Self {
        Self { adapter, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce the puzzle for `seed`, never using an id in `excluded`.
    ///
    /// Deterministic for a fixed pool, exclusion list, seed and oracle.
    /// Never fails: collaborator errors count as "incompatible" and an
    /// exhausted search returns the fallback.
    pub async fn generate(&self, seed: u64, excluded: &[CategoryId]) -> GeneratedPuzzle {
        let pool = self.candidate_pool(excluded);
        let domain = self.adapter.domain();

        let groups: BTreeSet<_> = pool.iter().map(|c| &c.group).collect();
        if groups.len() < GRID_SIZE {
            warn!(%domain, pool = pool.len(), groups = groups.len(), "pool cannot fill a grid, using fallback");
            return self.fallback(seed);
        }

        for attempt in 0..self.config.max_attempts {
            let shuffled = seeded_shuffle(&pool, attempt_seed(seed, attempt), self.config.shuffle);

            let Some((rows, cols)) = assign_axes(&shuffled) else {
                debug!(%domain, attempt, "greedy walk could not fill both axes");
                continue;
            };

            if self.all_compatible(&rows, &cols).await {
                info!(%domain, seed, attempt, "puzzle generated");
                return GeneratedPuzzle {
                    puzzle: Puzzle::new(rows, cols),
                    source: PuzzleSource::Generated { attempt },
                    seed,
                };
            }
            debug!(%domain, attempt, "attempt rejected by compatibility checks");
        }

        warn!(%domain, seed, attempts = self.config.max_attempts, "no valid grid found, using fallback");
        self.fallback(seed)
    }

    /// Pool minus excluded ids, first occurrence of each id kept.
    fn candidate_pool(&self, excluded: &[CategoryId]) -> Vec<Category> {
        let excluded: BTreeSet<&CategoryId> = excluded.iter().collect();
        let mut seen = BTreeSet::new();
        self.adapter
            .all_categories()
            .into_iter()
            .filter(|cat| !excluded.contains(&cat.id))
            .filter(|cat| seen.insert(cat.id.clone()))
            .collect()
    }

    /// Run all nine intersection checks together; every one must pass.
    async fn all_compatible(&self, rows: &[Category; GRID_SIZE], cols: &[Category; GRID_SIZE]) -> bool {
        let limit = self.config.check_timeout;
        let checks = rows
            .iter()
            .flat_map(|row| cols.iter().map(move |col| check_pair(self.adapter, row, col, limit)));
        join_all(checks).await.into_iter().all(|ok| ok)
    }

    fn fallback(&self, seed: u64) -> GeneratedPuzzle {
        GeneratedPuzzle {
            puzzle: self.adapter.fallback_puzzle(),
            source: PuzzleSource::Fallback,
            seed,
        }
    }
}

/// Greedy axis assignment over an already shuffled pool.
///
/// A category goes to the next free row unless a row already uses its group;
/// otherwise to the next free column unless a column already uses its group.
/// Returns `None` if either axis ends short of three.
fn assign_axes(shuffled: &[Category]) -> Option<([Category; GRID_SIZE], [Category; GRID_SIZE])> {
    let mut rows: Vec<Category> = Vec::with_capacity(GRID_SIZE);
    let mut cols: Vec<Category> = Vec::with_capacity(GRID_SIZE);

    for cat in shuffled {
        if rows.len() == GRID_SIZE && cols.len() == GRID_SIZE {
            break;
        }
        if rows.len() < GRID_SIZE && !rows.iter().any(|r| r.group == cat.group) {
            rows.push(cat.clone());
        } else if cols.len() < GRID_SIZE
            && !rows.iter().any(|r| r.id == cat.id)
            && !cols.iter().any(|c| c.group == cat.group)
        {
            cols.push(cat.clone());
        }
    }

    Some((rows.try_into().ok()?, cols.try_into().ok()?))
}

/// Fail-closed compatibility check for one pair.
///
/// Pairs in the adapter's exclusion matrix are rejected without calling the
/// oracle. Oracle errors and timeouts count as incompatible.
pub async fn check_pair<A>(adapter: &A, a: &Category, b: &Category, limit: Duration) -> bool
where
    A: CategoryAdapter + ?Sized,
{
    if adapter.exclusions().forbids(&a.id, &b.id) {
        return false;
    }

    let compatible = match timeout(limit, adapter.is_compatible(a, b)).await {
        Ok(Ok(compatible)) => compatible,
        Ok(Err(e)) => {
            warn!(a = %a.id, b = %b.id, error = %e, "compatibility check failed");
            false
        }
        Err(_) => {
            warn!(a = %a.id, b = %b.id, timeout_ms = limit.as_millis() as u64, "compatibility check timed out");
            false
        }
    };

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(a = %a.id, b = %b.id, compatible, "pair checked");

    compatible
}

// =============================================================================
// TESTS
// =============================================================================

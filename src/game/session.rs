//! Player Session
//!
//! Owns one player's [`GameState`] for one day's puzzle and drives it through
//! the adapter. A guess goes through three steps:
//!
//! 1. [`PlayerSession::begin_guess`] snapshots everything evaluation needs
//!    into a [`PendingGuess`] tagged with the session's selection epoch.
//! 2. [`evaluate`] resolves the entity and runs both category checks
//!    concurrently. It borrows nothing from the session.
//! 3. [`PlayerSession::apply`] commits the result, or drops it as stale when
//!    the epoch has moved on (the player picked another cell meanwhile).
//!
//! [`PlayerSession::submit_guess`] runs all three back to back.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::category::{entity_key, AdapterError, Category, CategoryAdapter, Domain, Entity};
use crate::game::events::{GameEvent, RejectReason};
use crate::game::state::{Cell, GameState, GameStatus};
use crate::puzzle::Puzzle;
use crate::store::{GuessRecord, ProgressStore};

/// Inputs that fill the selected cell without a lookup, when enabled.
pub const BYPASS_TOKENS: [&str; 3] = ["thisansweriscorrect", "cheat", "win"];

/// Player-facing rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Game already won or lost.
    #[error("Game is over")]
    GameOver,

    /// Guess submitted without a selected cell.
    #[error("No cell selected")]
    NoCellSelected,

    /// Cell already holds an entity.
    #[error("Cell {0} is already filled")]
    CellFilled(u8),

    /// Board index out of range.
    #[error("Invalid cell index: {0}")]
    InvalidCell(u8),

    /// Input matched nothing in the domain.
    #[error("No match found for \"{0}\"")]
    EntityNotFound(String),

    /// Entity already placed elsewhere on the board.
    #[error("{0} has already been used")]
    AlreadyUsed(String),

    /// Result arrived after the selection changed.
    #[error("Guess result is stale")]
    StaleGuess,

    /// Blank input.
    #[error("Guess is empty")]
    EmptyGuess,
}

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Accept [`BYPASS_TOKENS`] as correct answers.
    pub allow_bypass_tokens: bool,
    /// Per-call limit on `resolve_entity` and `matches`; expiry fails closed.
    pub match_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            allow_bypass_tokens: false,
            match_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Everything needed to judge one guess, detached from the session.
#[derive(Debug, Clone)]
pub struct PendingGuess {
    epoch: u64,
    cell: Cell,
    input: String,
    row: Category,
    col: Category,
    used: BTreeSet<String>,
    allow_bypass: bool,
    limit: Duration,
}

impl PendingGuess {
    /// Cell the guess targets.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Selection epoch the guess was issued under.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Trimmed player input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// What the adapter said about a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Input resolved to nothing.
    NotFound,
    /// Resolved entity is already on the board.
    Duplicate {
        /// Display name of the entity
        name: String,
    },
    /// Bypass token accepted.
    Bypass {
        /// Placeholder placed on the board
        name: String,
    },
    /// Both category checks ran.
    Judged {
        /// Display name of the entity
        name: String,
        /// Normalised identity
        key: String,
        /// Satisfies the row category
        row_ok: bool,
        /// Satisfies the column category
        col_ok: bool,
    },
}

/// A judged guess waiting to be applied.
#[derive(Debug, Clone)]
pub struct EvaluatedGuess {
    epoch: u64,
    cell: Cell,
    input: String,
    row_label: String,
    col_label: String,
    /// Adapter verdict
    pub evaluation: Evaluation,
}

/// Result of an applied guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    /// Cell the guess targeted
    pub cell: Cell,
    /// Entity name as resolved
    pub entity: String,
    /// Cell was filled
    pub correct: bool,
    /// Row category satisfied
    pub row_ok: bool,
    /// Column category satisfied
    pub col_ok: bool,
    /// Board status afterwards
    pub status: GameStatus,
    /// Guesses left afterwards
    pub guesses_remaining: u8,
}

impl GuessOutcome {
    /// Player-facing explanation of a wrong guess.
    pub fn failed_category(&self) -> Option<&'static str> {
        match (self.row_ok, self.col_ok) {
            (true, true) => None,
            (false, _) => Some("row"),
            (true, false) => Some("column"),
        }
    }
}

fn is_bypass_token(input: &str) -> bool {
    let lowered = input.to_lowercase();
    BYPASS_TOKENS.iter().any(|token| *token == lowered)
}

/// Bounded, fail-closed category check.
async fn check_match<A>(adapter: &A, entity: &A::Entity, category: &Category, limit: Duration) -> bool
where
    A: CategoryAdapter + ?Sized,
{
    match timeout(limit, adapter.matches(entity, category)).await {
        Ok(Ok(matched)) => matched,
        Ok(Err(e)) => {
            warn!("Match check for {} failed, scoring as miss: {}", category.id, e);
            false
        }
        Err(_) => {
            warn!("Match check for {} timed out, scoring as miss", category.id);
            false
        }
    }
}

/// Judge a pending guess against the adapter.
///
/// Never fails: resolution errors read as "not found" and check errors as
/// "does not match".
pub async fn evaluate<A>(adapter: &A, pending: PendingGuess) -> EvaluatedGuess
where
    A: CategoryAdapter + ?Sized,
{
    let PendingGuess { epoch, cell, input, row, col, used, allow_bypass, limit } = pending;

    let evaluation = if allow_bypass && is_bypass_token(&input) {
        Evaluation::Bypass {
            name: format!("✓ Cell {}", cell.index() + 1),
        }
    } else {
        let resolved = match timeout(limit, adapter.resolve_entity(&input)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout),
        };

        match resolved {
            Ok(None) => Evaluation::NotFound,
            Err(e) => {
                warn!("Resolving \"{}\" failed: {}", input, e);
                Evaluation::NotFound
            }
            Ok(Some(entity)) => {
                let name = entity.name().to_string();
                let key = entity_key(&name);
                if used.contains(&key) {
                    Evaluation::Duplicate { name }
                } else {
                    let (row_ok, col_ok) = tokio::join!(
                        check_match(adapter, &entity, &row, limit),
                        check_match(adapter, &entity, &col, limit),
                    );
                    Evaluation::Judged { name, key, row_ok, col_ok }
                }
            }
        }
    };

    EvaluatedGuess {
        epoch,
        cell,
        input,
        row_label: row.label,
        col_label: col.label,
        evaluation,
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// One player's run at one day's puzzle.
pub struct PlayerSession {
    /// Unique session identifier.
    pub id: Uuid,
    domain: Domain,
    seed: u64,
    date: String,
    puzzle: Arc<Puzzle>,
    state: GameState,
    config: SessionConfig,
    epoch: u64,
    events: Vec<GameEvent>,
    stats: Option<mpsc::UnboundedSender<GuessRecord>>,
    progress: Option<Arc<dyn ProgressStore>>,
}

impl PlayerSession {
    /// Start a fresh board.
    pub fn new(
        domain: Domain,
        seed: u64,
        date: impl Into<String>,
        puzzle: Arc<Puzzle>,
        config: SessionConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            seed,
            date: date.into(),
            puzzle,
            state: GameState::new(),
            config,
            epoch: 0,
            events: Vec::new(),
            stats: None,
            progress: None,
        }
    }

    /// Continue from saved progress.
    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = state;
        self
    }

    /// Report guesses to a stats forwarder.
    pub fn with_stats(mut self, stats: mpsc::UnboundedSender<GuessRecord>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Save after each guess.
    pub fn with_progress(mut self, store: Arc<dyn ProgressStore>) -> Self {
        self.progress = Some(store);
        self
    }

    /// Game this session plays.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Daily seed of the puzzle.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The fixed puzzle.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Current board.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current whole-board status.
    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Selection epoch; any change invalidates in-flight guesses.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the emitted events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Select a cell by board index.
    pub fn select_cell(&mut self, index: u8) -> Result<(), SessionError> {
        let cell = Cell::try_from(index)?;
        self.state.select_cell(cell)?;
        self.epoch += 1;
        self.events.push(GameEvent::cell_selected(self.state.guesses, cell));
        Ok(())
    }

    /// Select a cell and save the board, so a reload restores the selection.
    pub async fn select_cell_and_save(&mut self, index: u8) -> Result<(), SessionError> {
        self.select_cell(index)?;
        self.persist().await;
        Ok(())
    }

    /// Abandon the current selection.
    pub fn clear_selection(&mut self) {
        if self.state.selected_cell.take().is_some() {
            self.epoch += 1;
        }
    }

    /// Snapshot a guess for [`evaluate`].
    pub fn begin_guess(&self, input: &str) -> Result<PendingGuess, SessionError> {
        if self.state.game_over {
            return Err(SessionError::GameOver);
        }
        let cell = self.state.selected_cell.ok_or(SessionError::NoCellSelected)?;
        let input = input.trim();
        if input.is_empty() {
            return Err(SessionError::EmptyGuess);
        }

        Ok(PendingGuess {
            epoch: self.epoch,
            cell,
            input: input.to_string(),
            row: self.puzzle.row_category(cell).clone(),
            col: self.puzzle.col_category(cell).clone(),
            used: self.state.used_entity_names.clone(),
            allow_bypass: self.config.allow_bypass_tokens,
            limit: self.config.match_timeout,
        })
    }

    /// Commit an evaluated guess.
    pub fn apply(&mut self, result: EvaluatedGuess) -> Result<GuessOutcome, SessionError> {
        if result.epoch != self.epoch || self.state.selected_cell != Some(result.cell) {
            debug!(
                "Dropping stale guess for cell {} (epoch {} != {})",
                result.cell, result.epoch, self.epoch
            );
            return Err(SessionError::StaleGuess);
        }
        if self.state.game_over {
            return Err(SessionError::GameOver);
        }

        let EvaluatedGuess { cell, input, row_label, col_label, evaluation, .. } = result;
        let guesses = self.state.guesses;

        let (name, key, row_ok, col_ok, report) = match evaluation {
            Evaluation::NotFound => {
                self.events.push(GameEvent::guess_rejected(guesses, cell, input.clone(), RejectReason::NotFound));
                return Err(SessionError::EntityNotFound(input));
            }
            Evaluation::Duplicate { name } => {
                self.events.push(GameEvent::guess_rejected(guesses, cell, input, RejectReason::AlreadyUsed));
                return Err(SessionError::AlreadyUsed(name));
            }
            Evaluation::Bypass { name } => {
                let key = entity_key(&name);
                (name, key, true, true, false)
            }
            Evaluation::Judged { name, key, row_ok, col_ok } => (name, key, row_ok, col_ok, true),
        };

        if self.state.is_used(&key) {
            self.events.push(GameEvent::guess_rejected(guesses, cell, input, RejectReason::AlreadyUsed));
            return Err(SessionError::AlreadyUsed(name));
        }

        let correct = row_ok && col_ok;
        if correct {
            self.state.record_correct(cell, name.clone(), key);
            self.events.push(GameEvent::guess_accepted(
                self.state.guesses,
                cell,
                name.clone(),
                self.state.score,
            ));
        } else {
            self.state.record_wrong();
            let category = if row_ok { col_label } else { row_label };
            debug!("{} rejected for cell {}: doesn't match \"{}\"", name, cell, category);
            self.events.push(GameEvent::guess_rejected(
                self.state.guesses,
                cell,
                input,
                RejectReason::Mismatch { category },
            ));
        }
        self.epoch += 1;

        match self.state.status() {
            GameStatus::Won => {
                info!("Session {} won in {} guesses", self.id, self.state.guesses);
                self.events.push(GameEvent::game_won(self.state.guesses));
            }
            GameStatus::Lost => {
                info!("Session {} lost with score {}", self.id, self.state.score);
                self.events.push(GameEvent::game_lost(self.state.guesses, self.state.score));
            }
            GameStatus::InProgress => {}
        }

        if report {
            self.report(cell, &name, correct);
        }

        Ok(GuessOutcome {
            cell,
            entity: name,
            correct,
            row_ok,
            col_ok,
            status: self.state.status(),
            guesses_remaining: self.state.guesses_remaining(),
        })
    }

    /// Begin, evaluate and apply a guess, then save progress.
    pub async fn submit_guess<A>(&mut self, adapter: &A, input: &str) -> Result<GuessOutcome, SessionError>
    where
        A: CategoryAdapter + ?Sized,
    {
        let pending = self.begin_guess(input)?;
        let result = evaluate(adapter, pending).await;
        let outcome = self.apply(result)?;
        self.persist().await;
        Ok(outcome)
    }

    /// Save the board; failures are logged and ignored.
    pub async fn persist(&self) {
        let Some(store) = &self.progress else {
            return;
        };
        if let Err(e) = store.save(self.domain, self.seed, &self.state).await {
            warn!("Failed to save progress for {}: {}", self.domain, e);
        }
    }

    fn report(&self, cell: Cell, entity: &str, correct: bool) {
        let Some(stats) = &self.stats else {
            return;
        };
        let record = GuessRecord {
            domain: self.domain,
            date: self.date.clone(),
            cell: cell.index(),
            entity: entity.to_string(),
            correct,
        };
        if stats.send(record).is_err() {
            debug!("Stats forwarder gone, guess not recorded");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

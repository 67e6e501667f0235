//! Guess Statistics
//!
//! Every real guess (bypass tokens excluded) is reported as a [`GuessRecord`].
//! Sessions hand records to an unbounded channel and move on; a forwarder
//! task drains the channel into a [`StatsSink`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::StoreError;
use crate::category::Domain;
use crate::CELL_COUNT;

/// Normalised tally key: lowercase, anything but `[a-z0-9]` becomes `_`.
pub fn stats_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

/// One guess as seen by the stats collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    /// Game the guess was made in
    pub domain: Domain,
    /// `YYYY-MM-DD` of the puzzle
    pub date: String,
    /// Board index 0-8
    pub cell: u8,
    /// Resolved entity name
    pub entity: String,
    /// Did it fill the cell?
    pub correct: bool,
}

/// Append-only statistics boundary.
#[async_trait]
pub trait StatsSink: Send + Sync {
    /// Count one guess.
    async fn record(&self, record: GuessRecord) -> Result<(), StoreError>;
}

/// Per-entity counts within one cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTally {
    /// Name as first guessed
    pub name: String,
    /// Times guessed here
    pub count: u32,
    /// Times it was correct here
    pub correct: u32,
}

/// Tallies for one cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStats {
    /// All guesses in this cell
    pub total_guesses: u32,
    /// Correct guesses in this cell
    pub correct_guesses: u32,
    /// Keyed by [`stats_key`]
    pub cards: BTreeMap<String, CardTally>,
}

impl CellStats {
    /// Share of guesses that were correct, 0.0 with no guesses.
    pub fn accuracy(&self) -> f64 {
        if self.total_guesses == 0 {
            0.0
        } else {
            self.correct_guesses as f64 / self.total_guesses as f64
        }
    }

    /// Most guessed correct answer, ties broken by key order.
    pub fn most_popular(&self) -> Option<&CardTally> {
        self.cards
            .values()
            .filter(|tally| tally.correct > 0)
            .fold(None, |best: Option<&CardTally>, tally| match best {
                Some(b) if b.correct >= tally.correct => Some(b),
                _ => Some(tally),
            })
    }
}

/// Tallies for one (domain, date) puzzle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    /// Every guess on this puzzle
    pub total_guesses: u32,
    /// Index-aligned with the board
    pub cells: [CellStats; CELL_COUNT],
}

impl DayStats {
    fn apply(&mut self, record: &GuessRecord) {
        let Some(cell) = self.cells.get_mut(record.cell as usize) else {
            return;
        };
        self.total_guesses += 1;
        cell.total_guesses += 1;

        let tally = cell
            .cards
            .entry(stats_key(&record.entity))
            .or_insert_with(|| CardTally {
                name: record.entity.clone(),
                ..CardTally::default()
            });
        tally.count += 1;

        if record.correct {
            cell.correct_guesses += 1;
            tally.correct += 1;
        }
    }
}

/// In-memory sink keyed by (domain, date).
#[derive(Debug, Default)]
pub struct MemoryStatsSink {
    days: RwLock<BTreeMap<(Domain, String), DayStats>>,
}

impl MemoryStatsSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one day's tallies.
    pub async fn day(&self, domain: Domain, date: &str) -> Option<DayStats> {
        self.days.read().await.get(&(domain, date.to_string())).cloned()
    }
}

#[async_trait]
impl StatsSink for MemoryStatsSink {
    async fn record(&self, record: GuessRecord) -> Result<(), StoreError> {
        if record.cell as usize >= CELL_COUNT {
            return Err(StoreError::Serialization(format!("cell {} out of range", record.cell)));
        }
        let mut days = self.days.write().await;
        days.entry((record.domain, record.date.clone()))
            .or_default()
            .apply(&record);
        Ok(())
    }
}

/// Drain records from sessions into `sink` until every sender is dropped.
pub fn spawn_stats_forwarder(
    sink: Arc<dyn StatsSink>,
) -> (mpsc::UnboundedSender<GuessRecord>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<GuessRecord>();

    let handle = tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            if let Err(e) = sink.record(record).await {
                warn!("Dropping guess record: {}", e);
            }
        }
        debug!("Stats forwarder stopped");
    });

    (tx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cell: u8, entity: &str, correct: bool) -> GuessRecord {
        GuessRecord {
            domain: Domain::Mtg,
            date: "2026-03-01".into(),
            cell,
            entity: entity.into(),
            correct,
        }
    }

    #[test]
    fn test_stats_key_normalises() {
        assert_eq!(stats_key("Jace, the Mind Sculptor"), "jace__the_mind_sculptor");
        assert_eq!(stats_key("Sink into Oblivion (Red)"), "sink_into_oblivion__red_");
    }

    #[tokio::test]
    async fn test_sink_tallies_per_cell() {
        let sink = MemoryStatsSink::new();
        sink.record(record(0, "Lightning Bolt", true)).await.unwrap();
        sink.record(record(0, "lightning bolt", false)).await.unwrap();
        sink.record(record(0, "Shock", true)).await.unwrap();
        sink.record(record(5, "Shock", false)).await.unwrap();

        let day = sink.day(Domain::Mtg, "2026-03-01").await.unwrap();
        assert_eq!(day.total_guesses, 4);
        assert_eq!(day.cells[0].total_guesses, 3);
        assert_eq!(day.cells[0].correct_guesses, 2);

        let bolt = &day.cells[0].cards["lightning_bolt"];
        assert_eq!(bolt.name, "Lightning Bolt");
        assert_eq!((bolt.count, bolt.correct), (2, 1));
        assert_eq!(day.cells[5].correct_guesses, 0);
        assert!(sink.day(Domain::Fab, "2026-03-01").await.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_cell_rejected() {
        let sink = MemoryStatsSink::new();
        assert!(sink.record(record(9, "Shock", true)).await.is_err());
    }

    #[test]
    fn test_most_popular_needs_a_correct_guess() {
        let mut cell = CellStats::default();
        assert!(cell.most_popular().is_none());
        assert_eq!(cell.accuracy(), 0.0);

        let mut day = DayStats::default();
        day.apply(&record(2, "Shock", false));
        day.apply(&record(2, "Bolt", true));
        day.apply(&record(2, "Bolt", true));
        day.apply(&record(2, "Shock", true));
        cell = day.cells[2].clone();

        assert_eq!(cell.most_popular().unwrap().name, "Bolt");
        assert_eq!(cell.accuracy(), 0.75);
    }

    #[tokio::test]
    async fn test_forwarder_drains_channel() {
        let sink = Arc::new(MemoryStatsSink::new());
        let (tx, handle) = spawn_stats_forwarder(sink.clone());

        tx.send(record(1, "Shock", true)).unwrap();
        tx.send(record(9, "Broken", true)).unwrap();
        tx.send(record(1, "Bolt", false)).unwrap();
        drop(tx);
        handle.await.unwrap();

        let day = sink.day(Domain::Mtg, "2026-03-01").await.unwrap();
        assert_eq!(day.cells[1].total_guesses, 2);
    }
}

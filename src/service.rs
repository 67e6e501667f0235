//! Daily Puzzle Service
//!
//! Ties one domain adapter to its collaborators. Each UTC day's puzzle is
//! generated once per process and shared by every session opened for it.
//! Only the requested day and the one before it stay cached.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::category::{CategoryAdapter, CategoryId, Domain};
use crate::config::AppConfig;
use crate::core::seed::{daily_seed, date_key};
use crate::game::session::{PlayerSession, SessionConfig};
use crate::puzzle::{GeneratedPuzzle, GeneratorConfig, PuzzleGenerator};
use crate::store::{GuessRecord, HiddenCategories, ProgressStore};

/// Puzzle source and session factory for one domain.
pub struct DailyPuzzleService<A> {
    adapter: Arc<A>,
    generator: GeneratorConfig,
    session: SessionConfig,
    hidden: Arc<dyn HiddenCategories>,
    progress: Arc<dyn ProgressStore>,
    stats: Option<mpsc::UnboundedSender<GuessRecord>>,
    puzzles: RwLock<BTreeMap<NaiveDate, Arc<GeneratedPuzzle>>>,
}

impl<A: CategoryAdapter> DailyPuzzleService<A> {
    /// Create a service.
    pub fn new(
        adapter: Arc<A>,
        config: &AppConfig,
        hidden: Arc<dyn HiddenCategories>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            adapter,
            generator: config.generator,
            session: config.session.clone(),
            hidden,
            progress,
            stats: None,
            puzzles: RwLock::new(BTreeMap::new()),
        }
    }

    /// Forward every session's guesses to a stats channel.
    pub fn with_stats(mut self, stats: mpsc::UnboundedSender<GuessRecord>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Domain served.
    pub fn domain(&self) -> Domain {
        self.adapter.domain()
    }

    /// The adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Puzzle for `date`, generated on first request.
    pub async fn puzzle_for(&self, date: NaiveDate) -> Arc<GeneratedPuzzle> {
        let seed = daily_seed(date) as u64;

        if let Some(puzzle) = self.puzzles.read().await.get(&date) {
            return puzzle.clone();
        }

        let excluded = self.hidden_categories().await;
        let generated = PuzzleGenerator::new(self.adapter.as_ref(), self.generator)
            .generate(seed, &excluded)
            .await;

        let mut puzzles = self.puzzles.write().await;
        // A concurrent caller may have finished first; keep its copy.
        let puzzle = puzzles.entry(date).or_insert_with(|| Arc::new(generated)).clone();

        // Sessions opened just before midnight still share yesterday's grid.
        if let Some(oldest) = date.pred_opt() {
            let before = puzzles.len();
            puzzles.retain(|day, _| *day >= oldest);
            if puzzles.len() < before {
                debug!("Evicted {} cached puzzle(s) for {}", before - puzzles.len(), self.domain());
            }
        }
        puzzle
    }

    /// Open a session for `date`, resuming saved progress when it is usable.
    pub async fn open_session(&self, date: NaiveDate) -> PlayerSession {
        let generated = self.puzzle_for(date).await;
        let domain = self.domain();
        let seed = generated.seed;

        let mut session = PlayerSession::new(
            domain,
            seed,
            date_key(date),
            Arc::new(generated.puzzle.clone()),
            self.session.clone(),
        )
        .with_progress(self.progress.clone());

        match self.progress.load(domain, seed).await {
            Ok(Some(state)) => {
                info!("Resuming {} {} at {} guesses", domain, date_key(date), state.guesses);
                session = session.with_state(state);
            }
            Ok(None) => debug!("No saved progress for {} {}", domain, date_key(date)),
            Err(e) => warn!("Ignoring saved progress for {}: {}", domain, e),
        }

        if let Some(stats) = &self.stats {
            session = session.with_stats(stats.clone());
        }
        session
    }

    /// Days with a cached puzzle, oldest first.
    pub async fn cached_dates(&self) -> Vec<NaiveDate> {
        self.puzzles.read().await.keys().copied().collect()
    }

    async fn hidden_categories(&self) -> Vec<CategoryId> {
        match self.hidden.get(self.domain()).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Hidden category lookup failed for {}, hiding none: {}", self.domain(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::testing::TableAdapter;
    use crate::category::Category;
    use crate::game::state::{Cell, GameState};
    use crate::puzzle::PuzzleSource;
    use crate::store::{MemoryProgressStore, MemoryStatsSink, StaticHiddenCategories, StoreError, spawn_stats_forwarder};
    use async_trait::async_trait;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn service(hidden: StaticHiddenCategories) -> (DailyPuzzleService<TableAdapter>, Arc<MemoryProgressStore>) {
        service_with(TableAdapter::six_groups(), hidden)
    }

    fn service_with(
        adapter: TableAdapter,
        hidden: StaticHiddenCategories,
    ) -> (DailyPuzzleService<TableAdapter>, Arc<MemoryProgressStore>) {
        let progress = Arc::new(MemoryProgressStore::new());
        let service = DailyPuzzleService::new(
            Arc::new(adapter),
            &AppConfig::default(),
            Arc::new(hidden),
            progress.clone(),
        );
        (service, progress)
    }

    struct BrokenHidden;

    #[async_trait]
    impl HiddenCategories for BrokenHidden {
        async fn get(&self, _domain: Domain) -> Result<Vec<CategoryId>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn test_puzzle_generated_once_per_day() {
        let (service, _) = service(StaticHiddenCategories::new());

        let first = service.puzzle_for(date()).await;
        let second = service.puzzle_for(date()).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.seed, daily_seed(date()) as u64);
        assert_eq!(service.cached_dates().await, vec![date()]);
    }

    #[tokio::test]
    async fn test_cache_drops_days_before_yesterday() {
        let (service, _) = service(StaticHiddenCategories::new());
        let days: Vec<NaiveDate> = date().iter_days().take(4).collect();

        for day in &days {
            service.puzzle_for(*day).await;
        }
        assert_eq!(service.cached_dates().await, days[2..].to_vec());

        // Still served from cache
        let today = service.puzzle_for(days[3]).await;
        assert!(Arc::ptr_eq(&today, &service.puzzle_for(days[3]).await));

        // A late request for an old day does not evict newer ones
        service.puzzle_for(days[0]).await;
        assert_eq!(service.cached_dates().await, vec![days[0], days[2], days[3]]);
    }

    #[tokio::test]
    async fn test_hidden_category_never_appears() {
        // G gives group g1 a second member once A is hidden.
        let adapter = TableAdapter::six_groups().with_categories(vec![
            Category::new("A", "Alpha", "g1"),
            Category::new("B", "Bravo", "g1"),
            Category::new("C", "Charlie", "g2"),
            Category::new("D", "Delta", "g2"),
            Category::new("E", "Echo", "g3"),
            Category::new("F", "Foxtrot", "g3"),
            Category::new("G", "Golf", "g1"),
        ]);
        let (service, _) = service_with(adapter, StaticHiddenCategories::new().with(Domain::Mtg, &["A"]));
        let generated = service.puzzle_for(date()).await;
        assert!(matches!(generated.source, PuzzleSource::Generated { .. }));
        let ids = generated.puzzle.ids();
        assert!(ids.rows.iter().chain(ids.cols.iter()).all(|id| id.as_str() != "A"));
    }

    #[tokio::test]
    async fn test_hidden_lookup_failure_hides_nothing() {
        let progress = Arc::new(MemoryProgressStore::new());
        let service = DailyPuzzleService::new(
            Arc::new(TableAdapter::six_groups()),
            &AppConfig::default(),
            Arc::new(BrokenHidden),
            progress,
        );
        let generated = service.puzzle_for(date()).await;
        assert!(matches!(generated.source, PuzzleSource::Generated { .. }));
    }

    #[tokio::test]
    async fn test_session_resumes_saved_progress() {
        let (service, progress) = service(StaticHiddenCategories::new());
        let seed = daily_seed(date()) as u64;

        let mut saved = GameState::new();
        saved.select_cell(Cell::new(2).unwrap()).unwrap();
        progress.save(Domain::Mtg, seed, &saved).await.unwrap();

        let session = service.open_session(date()).await;
        assert_eq!(session.state(), &saved);
    }

    #[tokio::test]
    async fn test_corrupt_progress_starts_fresh() {
        let (service, progress) = service(StaticHiddenCategories::new());
        let seed = daily_seed(date()) as u64;
        progress.insert_raw(Domain::Mtg, seed, "{\"board\": 7}").await;

        let session = service.open_session(date()).await;
        assert_eq!(session.state(), &GameState::new());
    }

    #[tokio::test]
    async fn test_session_guesses_flow_to_stats_and_progress() {
        let (service, progress) = service(StaticHiddenCategories::new());
        let sink = Arc::new(MemoryStatsSink::new());
        let (tx, handle) = spawn_stats_forwarder(sink.clone());
        let service = service.with_stats(tx);

        let mut session = service.open_session(date()).await;
        let puzzle = session.puzzle().clone();
        let cell = Cell::new(0).unwrap();
        let mut tags = [
            puzzle.row_category(cell).id.as_str().to_string(),
            puzzle.col_category(cell).id.as_str().to_string(),
        ];
        tags.sort();
        let answer = tags.concat();

        session.select_cell(0).unwrap();
        assert!(session.submit_guess(service.adapter(), &answer).await.unwrap().correct);

        let saved = progress.load(Domain::Mtg, session.seed()).await.unwrap().unwrap();
        assert_eq!(saved.score, 1);

        drop(session);
        drop(service);
        handle.await.unwrap();
        let day = sink.day(Domain::Mtg, "2026-03-01").await.unwrap();
        assert_eq!(day.cells[0].correct_guesses, 1);
    }
}

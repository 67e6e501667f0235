//! TCGDoku Demo
//!
//! Generates today's puzzle for every built-in domain, solves it from the
//! local catalogs, and checks that replaying the guesses reproduces the board.

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tcgdoku::{
    AppConfig, DailyPuzzleService, VERSION,
    category::{entity_key, CategoryAdapter, CategoryId, Entity, RateLimitedAdapter, RateLimiter},
    core::seed::{date_key, today_utc},
    domains::{fab, gymnastics, mtg},
    game::{replay_guesses, Cell, RecordedGuess},
    store::{MemoryProgressStore, MemoryStatsSink, StaticHiddenCategories, spawn_stats_forwarder},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let date = config.date.unwrap_or_else(today_utc);

    info!("TCGDoku v{}", VERSION);
    info!("Puzzle date: {}", date_key(date));
    info!("Shuffle: {:?}, max attempts: {}", config.generator.shuffle, config.generator.max_attempts);

    let progress = Arc::new(MemoryProgressStore::new());
    let hidden = Arc::new(StaticHiddenCategories::new());
    let sink = Arc::new(MemoryStatsSink::new());
    let (stats, forwarder) = spawn_stats_forwarder(sink.clone());

    // MTG goes through the rate limiter, as a remote card search would.
    let limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let mtg = DailyPuzzleService::new(
        Arc::new(RateLimitedAdapter::new(mtg::catalog()?, limiter)),
        &config,
        hidden.clone(),
        progress.clone(),
    )
    .with_stats(stats.clone());
    play(&mtg, &config, date, |row, col| names(mtg.adapter().inner().typeable_answers(row, col))).await?;

    let fab = DailyPuzzleService::new(Arc::new(fab::catalog()?), &config, hidden.clone(), progress.clone())
        .with_stats(stats.clone());
    play(&fab, &config, date, |row, col| names(fab.adapter().typeable_answers(row, col))).await?;

    let gym = DailyPuzzleService::new(Arc::new(gymnastics::catalog()?), &config, hidden, progress.clone())
        .with_stats(stats);
    play(&gym, &config, date, |row, col| names(gym.adapter().typeable_answers(row, col))).await?;

    drop((mtg, fab, gym));
    forwarder.await.context("Stats forwarder panicked")?;

    if let Some(day) = sink.day(tcgdoku::Domain::Mtg, &date_key(date)).await {
        info!("MTG guesses recorded: {}", day.total_guesses);
    }
    info!("Saved days: {}", progress.len().await);

    Ok(())
}

fn names<E: Entity>(entities: Vec<&E>) -> Vec<String> {
    entities.into_iter().map(|e| e.name().to_string()).collect()
}

/// Solve one domain's puzzle and verify the replay.
async fn play<A, F>(
    service: &DailyPuzzleService<A>,
    config: &AppConfig,
    date: NaiveDate,
    solve: F,
) -> anyhow::Result<()>
where
    A: CategoryAdapter,
    F: Fn(&CategoryId, &CategoryId) -> Vec<String>,
{
    let domain = service.domain();
    info!("=== {} {} ({}) ===", domain.emoji(), domain.short_name(), domain.display_name());

    let generated = service.puzzle_for(date).await;
    let puzzle = &generated.puzzle;
    info!("Seed: {}, source: {:?}", generated.seed, generated.source);
    info!("Fingerprint: {}", hex::encode(puzzle.fingerprint()));
    info!("Rows: {:?}", puzzle.rows.iter().map(|c| c.label.as_str()).collect::<Vec<_>>());
    info!("Cols: {:?}", puzzle.cols.iter().map(|c| c.label.as_str()).collect::<Vec<_>>());

    let mut session = service.open_session(date).await;
    let mut played = Vec::new();

    for cell in Cell::all() {
        if session.status().is_over() {
            break;
        }
        if session.state().entity_at(cell).is_some() {
            continue;
        }

        let row = puzzle.row_category(cell);
        let col = puzzle.col_category(cell);
        let answer = solve(&row.id, &col.id)
            .into_iter()
            .find(|name| !session.state().is_used(&entity_key(name)));
        let Some(answer) = answer else {
            warn!("No unused answer for {} x {}", row.label, col.label);
            continue;
        };

        session.select_cell_and_save(cell.index()).await?;
        let outcome = session.submit_guess(service.adapter(), &answer).await?;
        info!(
            "Cell {}: {} x {} -> {} ({})",
            cell,
            row.label,
            col.label,
            outcome.entity,
            if outcome.correct { "correct" } else { "wrong" }
        );
        played.push(RecordedGuess::new(cell.index(), answer));
    }

    let state = session.state();
    info!("Status: {:?}, score {}/{}", state.status(), state.score, state.guesses);

    let replayed = replay_guesses(service.adapter(), puzzle, &played, config.session.clone()).await;
    let live_hash = state.compute_hash(generated.seed);
    let replay_hash = replayed.compute_hash(generated.seed);
    if live_hash != replay_hash {
        bail!(
            "{} replay diverged: {} != {}",
            domain,
            hex::encode(live_hash),
            hex::encode(replay_hash)
        );
    }
    info!("Replay hash: {}", hex::encode(replay_hash));

    Ok(())
}

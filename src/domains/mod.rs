//! Built-in Domains
//!
//! Curated category pools and entity lists for each supported game, served
//! through [`LocalCatalog`].
//!
//! ## Module Structure
//!
//! - `catalog`: generic in-memory adapter
//! - `mtg`: Magic: The Gathering cards
//! - `fab`: Flesh and Blood printings
//! - `gymnastics`: gymnastics skills and the apparatus exclusion table

pub mod catalog;
pub mod mtg;
pub mod fab;
pub mod gymnastics;

pub use catalog::LocalCatalog;
pub use mtg::{MtgCard, MtgCatalog, MtgFilter};
pub use fab::{FabCard, FabCatalog, FabFilter};
pub use gymnastics::{GymCatalog, Skill, SkillFilter};

/// Generate every day of `year` with the default generator settings.
///
/// Returns fallback days, days whose grid repeats the previous day's, and
/// the number of distinct grids.
#[cfg(test)]
pub(crate) async fn year_of_puzzles<A: crate::category::CategoryAdapter>(
    adapter: &A,
    year: i32,
) -> (usize, usize, usize) {
    use std::collections::BTreeSet;

    use chrono::{Datelike, NaiveDate};

    use crate::core::seed::daily_seed;
    use crate::puzzle::{GeneratorConfig, PuzzleGenerator, PuzzleSource};

    let generator = PuzzleGenerator::new(adapter, GeneratorConfig::default());
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();

    let mut fallbacks = 0;
    let mut repeats = 0;
    let mut distinct = BTreeSet::new();
    let mut previous = None;
    for day in start.iter_days().take_while(|d| d.year() == year) {
        let generated = generator.generate(daily_seed(day) as u64, &[]).await;
        if generated.source == PuzzleSource::Fallback {
            fallbacks += 1;
        }
        let fingerprint = generated.puzzle.fingerprint();
        if previous == Some(fingerprint) {
            repeats += 1;
        }
        distinct.insert(fingerprint);
        previous = Some(fingerprint);
    }
    (fallbacks, repeats, distinct.len())
}

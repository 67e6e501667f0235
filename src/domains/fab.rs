//! Flesh and Blood
//!
//! Most cards are printed in up to three pitch colours. Each printing is its
//! own entity named `"Name (Red|Yellow|Blue)"`; the bare name resolves to the
//! first printing. Heroes, tokens and weapons are never guessable.

use serde::{Serialize, Deserialize};

use crate::category::{CategoryDef, Domain, Entity, EntityFilter};
use crate::puzzle::{PuzzleError, PuzzleIds};

use super::catalog::LocalCatalog;

/// Local Flesh and Blood catalog.
pub type FabCatalog = LocalCatalog<FabCard, FabFilter>;

/// Categories offered to the daily generator (the rest exist for custom
/// puzzles only).
///
/// Every card has one class, pitch, rarity and cost, so a grid only works
/// when rows and columns draw from different groups. The nested power and
/// defense thresholds cross each other and keep enough grids viable.
pub const GENERATION_POOL: &[&str] = &[
    "brute", "guardian", "ninja", "warrior", "mechanologist",
    "pitch1", "pitch2", "pitch3",
    "attack", "nonAttack",
    "common", "rare", "majestic",
    "cost0", "cost1", "cost2",
    "power3plus",
    "defense2plus", "defense3plus",
    "goAgain",
];

const UNPLAYABLE_TYPES: [&str; 3] = ["Hero", "Token", "Weapon"];

// =============================================================================
// CARDS
// =============================================================================

/// Card rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FabRarity {
    /// Common
    Common,
    /// Rare
    Rare,
    /// Super Rare
    SuperRare,
    /// Majestic
    Majestic,
    /// Legendary
    Legendary,
}

/// Pitch colour name for a pitch value.
pub fn pitch_color(pitch: u8) -> Option<&'static str> {
    match pitch {
        1 => Some("Red"),
        2 => Some("Yellow"),
        3 => Some("Blue"),
        _ => None,
    }
}

/// One printing of a Flesh and Blood card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabCard {
    /// Display name, with pitch colour when pitched
    pub name: String,
    /// Printed name
    pub base_name: String,
    /// Hero classes (`Generic` for class-less cards)
    pub classes: Vec<String>,
    /// Card types (`Action`, `Defense Reaction`, ...)
    pub types: Vec<String>,
    /// Subtypes (`Attack`, `Non-Attack`, `Aura`)
    pub subtypes: Vec<String>,
    /// Rarity
    pub rarity: FabRarity,
    /// Resource cost
    pub cost: Option<u8>,
    /// Pitch value 1-3
    pub pitch: Option<u8>,
    /// Attack power
    pub power: Option<u8>,
    /// Defense value
    pub defense: Option<u8>,
    /// Keywords (`Go again`, `Dominate`, ...)
    pub keywords: Vec<String>,
}

impl FabCard {
    /// Heroes, tokens and weapons are excluded from guessing.
    pub fn is_playable(&self) -> bool {
        !self.types.iter().any(|t| UNPLAYABLE_TYPES.contains(&t.as_str()))
    }
}

impl Entity for FabCard {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> Vec<String> {
        vec![self.base_name.clone()]
    }
}

/// Card template expanded into one [`FabCard`] per printing.
struct Print {
    card: FabCard,
}

fn card(name: &str, class: &str, types: &[&str], subtypes: &[&str], rarity: FabRarity) -> Print {
    let strings = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
    Print {
        card: FabCard {
            name: name.to_string(),
            base_name: name.to_string(),
            classes: vec![class.to_string()],
            types: strings(types),
            subtypes: strings(subtypes),
            rarity,
            cost: None,
            pitch: None,
            power: None,
            defense: None,
            keywords: Vec::new(),
        },
    }
}

impl Print {
    fn cost(mut self, cost: u8) -> Self {
        self.card.cost = Some(cost);
        self
    }

    fn power(mut self, power: u8) -> Self {
        self.card.power = Some(power);
        self
    }

    fn defense(mut self, defense: u8) -> Self {
        self.card.defense = Some(defense);
        self
    }

    fn keywords(mut self, keywords: &[&str]) -> Self {
        self.card.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// No pitch: equipment, weapons, heroes.
    fn unpitched(self) -> Vec<FabCard> {
        vec![self.card]
    }

    /// A single printing.
    fn pitch(self, pitch: u8) -> Vec<FabCard> {
        let mut card = self.card;
        card.pitch = Some(pitch);
        if let Some(color) = pitch_color(pitch) {
            card.name = format!("{} ({color})", card.base_name);
        }
        vec![card]
    }

    /// Red, yellow and blue printings; power drops by one per step.
    fn cycle(self) -> Vec<FabCard> {
        (1..=3u8)
            .flat_map(|pitch| {
                let mut print = Print { card: self.card.clone() };
                print.card.power = self.card.power.map(|p| p.saturating_sub(pitch - 1));
                print.pitch(pitch)
            })
            .collect()
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Behaviour of a Flesh and Blood category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FabFilter {
    /// Has this class
    Class(&'static str),
    /// Pitch value equals
    Pitch(u8),
    /// Has this card type
    Type(&'static str),
    /// Has this subtype
    Subtype(&'static str),
    /// Rarity equals
    Rarity(FabRarity),
    /// Cost equals
    Cost(u8),
    /// Cost at least
    CostAtLeast(u8),
    /// Power at least
    PowerAtLeast(u8),
    /// Defense at least
    DefenseAtLeast(u8),
    /// Has keyword
    Keyword(&'static str),
}

impl EntityFilter<FabCard> for FabFilter {
    fn matches(&self, card: &FabCard) -> bool {
        match *self {
            FabFilter::Class(c) => has(&card.classes, c),
            FabFilter::Pitch(p) => card.pitch == Some(p),
            FabFilter::Type(t) => has(&card.types, t),
            FabFilter::Subtype(s) => has(&card.subtypes, s),
            FabFilter::Rarity(r) => card.rarity == r,
            FabFilter::Cost(c) => card.cost == Some(c),
            FabFilter::CostAtLeast(c) => card.cost.is_some_and(|v| v >= c),
            FabFilter::PowerAtLeast(p) => card.power.is_some_and(|v| v >= p),
            FabFilter::DefenseAtLeast(d) => card.defense.is_some_and(|v| v >= d),
            FabFilter::Keyword(k) => has(&card.keywords, k),
        }
    }
}

fn has(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v == value)
}

/// Every Flesh and Blood category.
pub fn categories() -> Vec<CategoryDef<FabFilter>> {
    use FabFilter as F;

    vec![
        CategoryDef::new("brute", "Brute", "classes", F::Class("Brute")),
        CategoryDef::new("guardian", "Guardian", "classes", F::Class("Guardian")),
        CategoryDef::new("ninja", "Ninja", "classes", F::Class("Ninja")),
        CategoryDef::new("wizard", "Wizard", "classes", F::Class("Wizard")),
        CategoryDef::new("warrior", "Warrior", "classes", F::Class("Warrior")),
        CategoryDef::new("mechanologist", "Mechanologist", "classes", F::Class("Mechanologist")),
        CategoryDef::new("runeblade", "Runeblade", "classes", F::Class("Runeblade")),
        CategoryDef::new("ranger", "Ranger", "classes", F::Class("Ranger")),
        CategoryDef::new("illusionist", "Illusionist", "classes", F::Class("Illusionist")),
        CategoryDef::new("generic", "Generic", "classes", F::Class("Generic")),
        CategoryDef::new("assassin", "Assassin", "classes", F::Class("Assassin")),
        CategoryDef::new("necromancer", "Necromancer", "classes", F::Class("Necromancer")),
        CategoryDef::new("pitch1", "Red (Pitch 1)", "pitch", F::Pitch(1)),
        CategoryDef::new("pitch2", "Yellow (Pitch 2)", "pitch", F::Pitch(2)),
        CategoryDef::new("pitch3", "Blue (Pitch 3)", "pitch", F::Pitch(3)),
        CategoryDef::new("action", "Action", "types", F::Type("Action")),
        CategoryDef::new("attackReaction", "Attack Reaction", "types", F::Type("Attack Reaction")),
        CategoryDef::new("defenseReaction", "Defense Reaction", "types", F::Type("Defense Reaction")),
        CategoryDef::new("instant", "Instant", "types", F::Type("Instant")),
        CategoryDef::new("equipment", "Equipment", "types", F::Type("Equipment")),
        CategoryDef::new("weapon", "Weapon", "types", F::Type("Weapon")),
        CategoryDef::new("attack", "Attack", "subtypes", F::Subtype("Attack")),
        CategoryDef::new("nonAttack", "Non-Attack", "subtypes", F::Subtype("Non-Attack")),
        CategoryDef::new("aura", "Aura", "subtypes", F::Subtype("Aura")),
        CategoryDef::new("common", "Common", "rarity", F::Rarity(FabRarity::Common)),
        CategoryDef::new("rare", "Rare", "rarity", F::Rarity(FabRarity::Rare)),
        CategoryDef::new("majestic", "Majestic", "rarity", F::Rarity(FabRarity::Majestic)),
        CategoryDef::new("legendary", "Legendary", "rarity", F::Rarity(FabRarity::Legendary)),
        CategoryDef::new("superRare", "Super Rare", "rarity", F::Rarity(FabRarity::SuperRare)),
        CategoryDef::new("cost0", "Cost 0", "cost", F::Cost(0)),
        CategoryDef::new("cost1", "Cost 1", "cost", F::Cost(1)),
        CategoryDef::new("cost2", "Cost 2", "cost", F::Cost(2)),
        CategoryDef::new("cost3plus", "Cost 3+", "cost", F::CostAtLeast(3)),
        CategoryDef::new("power3plus", "Power 3+", "power", F::PowerAtLeast(3)),
        CategoryDef::new("power5plus", "Power 5+", "power", F::PowerAtLeast(5)),
        CategoryDef::new("power7plus", "Power 7+", "power", F::PowerAtLeast(7)),
        CategoryDef::new("defense2plus", "Defense 2+", "defense", F::DefenseAtLeast(2)),
        CategoryDef::new("defense3plus", "Defense 3+", "defense", F::DefenseAtLeast(3)),
        CategoryDef::new("goAgain", "Go Again", "keywords", F::Keyword("Go again")),
        CategoryDef::new("dominate", "Dominate", "keywords", F::Keyword("Dominate")),
        CategoryDef::new("intimidate", "Intimidate", "keywords", F::Keyword("Intimidate")),
        CategoryDef::new("combo", "Combo", "keywords", F::Keyword("Combo")),
        CategoryDef::new("boost", "Boost", "keywords", F::Keyword("Boost")),
    ]
}

/// Every bundled printing, playable or not.
pub fn all_printings() -> Vec<FabCard> {
    use FabRarity::*;

    [
        // Brute
        card("Pack Hunt", "Brute", &["Action"], &["Attack"], Common).cost(2).power(6).defense(2).keywords(&["Intimidate"]).cycle(),
        card("Smash Instinct", "Brute", &["Action"], &["Attack"], Common).cost(3).power(7).defense(3).keywords(&["Intimidate"]).cycle(),
        card("Barraging Beatdown", "Brute", &["Action"], &["Non-Attack"], Rare).cost(1).defense(2).keywords(&["Go again", "Intimidate"]).cycle(),
        card("Bloodrush Bellow", "Brute", &["Action"], &["Non-Attack"], Majestic).cost(2).defense(2).keywords(&["Go again"]).pitch(2),
        // Guardian
        card("Pummel", "Guardian", &["Attack Reaction"], &[], Common).cost(2).defense(3).cycle(),
        card("Disable", "Guardian", &["Action"], &["Attack"], Common).cost(3).power(7).defense(3).keywords(&["Dominate"]).cycle(),
        card("Crippling Crush", "Guardian", &["Action"], &["Attack"], Majestic).cost(7).power(11).defense(3).keywords(&["Dominate"]).pitch(1),
        card("Anothos", "Guardian", &["Weapon"], &[], Rare).cost(3).power(4).unpitched(),
        card("Stonewall Confidence", "Guardian", &["Action"], &["Non-Attack"], Rare).cost(2).defense(3).cycle(),
        // Ninja
        card("Head Jab", "Ninja", &["Action"], &["Attack"], Common).cost(0).power(3).defense(2).keywords(&["Go again"]).cycle(),
        card("Leg Tap", "Ninja", &["Action"], &["Attack"], Common).cost(0).power(4).defense(2).keywords(&["Combo", "Go again"]).cycle(),
        card("Hurricane Technique", "Ninja", &["Action"], &["Attack"], Majestic).cost(0).power(4).defense(3).keywords(&["Combo"]).pitch(2),
        card("Whelming Gustwave", "Ninja", &["Action"], &["Attack"], Rare).cost(1).power(3).defense(2).keywords(&["Combo"]).cycle(),
        // Wizard
        card("Aether Flare", "Wizard", &["Action"], &["Non-Attack"], Common).cost(1).defense(3).cycle(),
        card("Blazing Aether", "Wizard", &["Action"], &["Non-Attack"], Majestic).cost(0).defense(3).pitch(1),
        card("Sonic Boom", "Wizard", &["Instant"], &[], Rare).cost(1).pitch(3),
        // Warrior
        card("Driving Blade", "Warrior", &["Action"], &["Non-Attack"], Common).cost(1).defense(2).keywords(&["Go again"]).cycle(),
        card("Sharpen Steel", "Warrior", &["Attack Reaction"], &[], Common).cost(0).defense(3).cycle(),
        card("Steelblade Supremacy", "Warrior", &["Action"], &["Non-Attack"], Majestic).cost(1).defense(3).keywords(&["Go again"]).pitch(1),
        // Mechanologist
        card("Zipper Hit", "Mechanologist", &["Action"], &["Attack"], Common).cost(2).power(4).defense(3).keywords(&["Boost"]).cycle(),
        card("Pedal to the Metal", "Mechanologist", &["Action"], &["Non-Attack"], Rare).cost(0).defense(2).keywords(&["Go again"]).cycle(),
        card("High Octane", "Mechanologist", &["Action"], &["Non-Attack"], Majestic).cost(0).defense(2).keywords(&["Go again"]).pitch(1),
        // Runeblade
        card("Mauvrion Skies", "Runeblade", &["Action"], &["Aura"], Rare).cost(0).defense(2).keywords(&["Go again"]).cycle(),
        // Generic
        card("Sink Below", "Generic", &["Defense Reaction"], &[], Common).cost(0).defense(4).cycle(),
        card("Fate Foreseen", "Generic", &["Defense Reaction"], &[], Rare).cost(0).defense(4).pitch(1),
        card("Sigil of Solace", "Generic", &["Instant"], &[], Common).cost(0).cycle(),
        card("Enlightened Strike", "Generic", &["Action"], &["Attack"], Majestic).cost(0).power(5).defense(2).keywords(&["Go again"]).pitch(1),
        card("Command and Conquer", "Generic", &["Action"], &["Attack"], Majestic).cost(2).power(6).defense(3).pitch(1),
        card("Nullrune Hood", "Generic", &["Equipment"], &[], Rare).defense(1).unpitched(),
        card("Fyendal's Spring Tunic", "Generic", &["Equipment"], &[], Legendary).defense(1).unpitched(),
        card("Cracked Bauble", "Generic", &["Resource"], &[], Common).pitch(2),
        // Heroes and tokens
        card("Bravo, Showstopper", "Guardian", &["Hero"], &[], SuperRare).unpitched(),
        card("Runechant", "Runeblade", &["Token"], &["Aura"], Common).unpitched(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Guessable printings only.
pub fn cards() -> Vec<FabCard> {
    all_printings().into_iter().filter(FabCard::is_playable).collect()
}

/// Catalog with the bundled cards, generating from [`GENERATION_POOL`].
///
/// Fallback grid: Brute / Guardian / Warrior against Red / Yellow / Blue.
pub fn catalog() -> Result<FabCatalog, PuzzleError> {
    Ok(LocalCatalog::new(
        Domain::Fab,
        categories(),
        cards(),
        PuzzleIds::new(["brute", "guardian", "warrior"], ["pitch1", "pitch2", "pitch3"]),
    )?
    .with_generation_pool(GENERATION_POOL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryAdapter, CategoryId};

    #[test]
    fn test_cycle_names_and_power() {
        let printings: Vec<FabCard> = cards().into_iter().filter(|c| c.base_name == "Pack Hunt").collect();
        let names: Vec<&str> = printings.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pack Hunt (Red)", "Pack Hunt (Yellow)", "Pack Hunt (Blue)"]);
        let power: Vec<Option<u8>> = printings.iter().map(|c| c.power).collect();
        assert_eq!(power, vec![Some(6), Some(5), Some(4)]);
    }

    #[test]
    fn test_unplayable_types_removed() {
        let names: Vec<String> = cards().into_iter().map(|c| c.base_name).collect();
        assert!(!names.iter().any(|n| n == "Anothos" || n == "Runechant" || n == "Bravo, Showstopper"));
        assert!(all_printings().iter().any(|c| c.base_name == "Anothos"));
    }

    #[tokio::test]
    async fn test_display_name_then_base_name() {
        let catalog = catalog().unwrap();
        let blue = catalog.resolve_entity("sink below (blue)").await.unwrap().unwrap();
        assert_eq!(blue.pitch, Some(3));
        // Bare name resolves to the first printing
        let bare = catalog.resolve_entity("Sink Below").await.unwrap().unwrap();
        assert_eq!(bare.name, "Sink Below (Red)");
        let unpitched = catalog.resolve_entity("nullrune hood").await.unwrap().unwrap();
        assert_eq!(unpitched.name, "Nullrune Hood");
    }

    #[test]
    fn test_generation_pool_subset() {
        let catalog = catalog().unwrap();
        let pool = catalog.all_categories();
        assert_eq!(pool.len(), GENERATION_POOL.len());
        assert!(pool.iter().all(|c| c.id.as_str() != "aura"));
        assert!(catalog.category(&CategoryId::new("aura")).is_some());
    }

    #[test]
    fn test_fallback_is_solvable() {
        let catalog = catalog().unwrap();
        for (_, row, col) in catalog.fallback_puzzle().intersections() {
            assert!(!catalog.answers(&row.id, &col.id).is_empty(), "{} x {}", row.id, col.id);
        }
    }

    #[tokio::test]
    async fn test_daily_grids_for_a_year() {
        let catalog = catalog().unwrap();
        let (fallbacks, repeats, distinct) = crate::domains::year_of_puzzles(&catalog, 2026).await;
        assert!(fallbacks <= 18, "{fallbacks} fallback days");
        assert_eq!(repeats, 0, "neighbouring days share a grid");
        assert!(distinct >= 300, "only {distinct} distinct grids");
    }
}

//! Magic: The Gathering
//!
//! Categories follow card-search semantics: colour, type line words, mana
//! value, rarity, keywords and power/toughness thresholds.

use serde::{Serialize, Deserialize};

use crate::category::{CategoryDef, Domain, Entity, EntityFilter};
use crate::puzzle::{PuzzleError, PuzzleIds};

use super::catalog::LocalCatalog;

/// Local MTG catalog.
pub type MtgCatalog = LocalCatalog<MtgCard, MtgFilter>;

/// Categories offered to the daily generator.
///
/// Creature types, stats and most keywords cross too few bundled cards to
/// fill a grid reliably; they stay available for custom puzzles.
pub const GENERATION_POOL: &[&str] = &[
    "white", "blue", "black", "red", "green",
    "creature", "artifact", "enchantment",
    "mv1", "mv2", "mv3", "mv4plus",
    "common", "uncommon", "rare", "mythic",
    "flying", "haste",
];

// =============================================================================
// CARDS
// =============================================================================

/// Card rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Common
    Common,
    /// Uncommon
    Uncommon,
    /// Rare
    Rare,
    /// Mythic rare
    Mythic,
}

/// One Magic card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtgCard {
    /// Card name
    pub name: String,
    /// Colour letters from `WUBRG`; empty for colourless
    pub colors: String,
    /// Full type line, e.g. `Legendary Creature — Human Soldier`
    pub type_line: String,
    /// Mana value
    pub mana_value: u8,
    /// Rarity
    pub rarity: Rarity,
    /// Keyword abilities
    pub keywords: Vec<String>,
    /// Power, creatures only
    pub power: Option<u8>,
    /// Toughness, creatures only
    pub toughness: Option<u8>,
}

impl MtgCard {
    fn new(name: &str, colors: &str, type_line: &str, mana_value: u8, rarity: Rarity) -> Self {
        Self {
            name: name.to_string(),
            colors: colors.to_string(),
            type_line: type_line.to_string(),
            mana_value,
            rarity,
            keywords: Vec::new(),
            power: None,
            toughness: None,
        }
    }

    fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    fn pt(mut self, power: u8, toughness: u8) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    /// Lowercase words of the type line.
    pub fn type_words(&self) -> impl Iterator<Item = String> + '_ {
        self.type_line
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
    }
}

impl Entity for MtgCard {
    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Behaviour of an MTG category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MtgFilter {
    /// Card includes this colour letter
    Color(char),
    /// No colours
    Colorless,
    /// Two or more colours
    Multicolor,
    /// Type line contains this word (card type or subtype)
    TypeWord(&'static str),
    /// Mana value equals
    ManaValue(u8),
    /// Mana value at least
    ManaValueAtLeast(u8),
    /// Rarity equals
    Rarity(Rarity),
    /// Has keyword (case-insensitive)
    Keyword(&'static str),
    /// Power equals
    Power(u8),
    /// Power at least
    PowerAtLeast(u8),
    /// Toughness at least
    ToughnessAtLeast(u8),
}

impl EntityFilter<MtgCard> for MtgFilter {
    fn matches(&self, card: &MtgCard) -> bool {
        match *self {
            MtgFilter::Color(c) => card.colors.contains(c),
            MtgFilter::Colorless => card.colors.is_empty(),
            MtgFilter::Multicolor => card.colors.chars().count() >= 2,
            MtgFilter::TypeWord(word) => card.type_words().any(|w| w == word),
            MtgFilter::ManaValue(v) => card.mana_value == v,
            MtgFilter::ManaValueAtLeast(v) => card.mana_value >= v,
            MtgFilter::Rarity(r) => card.rarity == r,
            MtgFilter::Keyword(k) => card.keywords.iter().any(|kw| kw.eq_ignore_ascii_case(k)),
            MtgFilter::Power(p) => card.power == Some(p),
            MtgFilter::PowerAtLeast(p) => card.power.is_some_and(|v| v >= p),
            MtgFilter::ToughnessAtLeast(t) => card.toughness.is_some_and(|v| v >= t),
        }
    }
}

/// Every MTG category, grouped as on the category editor.
pub fn categories() -> Vec<CategoryDef<MtgFilter>> {
    use MtgFilter as F;

    vec![
        CategoryDef::new("white", "White", "colors", F::Color('W')),
        CategoryDef::new("blue", "Blue", "colors", F::Color('U')),
        CategoryDef::new("black", "Black", "colors", F::Color('B')),
        CategoryDef::new("red", "Red", "colors", F::Color('R')),
        CategoryDef::new("green", "Green", "colors", F::Color('G')),
        CategoryDef::new("colorless", "Colorless", "colors", F::Colorless),
        CategoryDef::new("multicolor", "Multicolor", "colors", F::Multicolor),
        CategoryDef::new("creature", "Creature", "types", F::TypeWord("creature")),
        CategoryDef::new("instant", "Instant", "types", F::TypeWord("instant")),
        CategoryDef::new("sorcery", "Sorcery", "types", F::TypeWord("sorcery")),
        CategoryDef::new("enchantment", "Enchantment", "types", F::TypeWord("enchantment")),
        CategoryDef::new("artifact", "Artifact", "types", F::TypeWord("artifact")),
        CategoryDef::new("planeswalker", "Planeswalker", "types", F::TypeWord("planeswalker")),
        CategoryDef::new("land", "Land", "types", F::TypeWord("land")),
        CategoryDef::new("human", "Human", "creatureTypes", F::TypeWord("human")),
        CategoryDef::new("elf", "Elf", "creatureTypes", F::TypeWord("elf")),
        CategoryDef::new("goblin", "Goblin", "creatureTypes", F::TypeWord("goblin")),
        CategoryDef::new("zombie", "Zombie", "creatureTypes", F::TypeWord("zombie")),
        CategoryDef::new("dragon", "Dragon", "creatureTypes", F::TypeWord("dragon")),
        CategoryDef::new("angel", "Angel", "creatureTypes", F::TypeWord("angel")),
        CategoryDef::new("vampire", "Vampire", "creatureTypes", F::TypeWord("vampire")),
        CategoryDef::new("wizard", "Wizard", "creatureTypes", F::TypeWord("wizard")),
        CategoryDef::new("warrior", "Warrior", "creatureTypes", F::TypeWord("warrior")),
        CategoryDef::new("spirit", "Spirit", "creatureTypes", F::TypeWord("spirit")),
        CategoryDef::new("mv1", "MV = 1", "manaValue", F::ManaValue(1)),
        CategoryDef::new("mv2", "MV = 2", "manaValue", F::ManaValue(2)),
        CategoryDef::new("mv3", "MV = 3", "manaValue", F::ManaValue(3)),
        CategoryDef::new("mv4plus", "MV ≥ 4", "manaValue", F::ManaValueAtLeast(4)),
        CategoryDef::new("mv6plus", "MV ≥ 6", "manaValue", F::ManaValueAtLeast(6)),
        CategoryDef::new("common", "Common", "rarity", F::Rarity(Rarity::Common)),
        CategoryDef::new("uncommon", "Uncommon", "rarity", F::Rarity(Rarity::Uncommon)),
        CategoryDef::new("rare", "Rare", "rarity", F::Rarity(Rarity::Rare)),
        CategoryDef::new("mythic", "Mythic", "rarity", F::Rarity(Rarity::Mythic)),
        CategoryDef::new("flying", "Flying", "keywords", F::Keyword("flying")),
        CategoryDef::new("trample", "Trample", "keywords", F::Keyword("trample")),
        CategoryDef::new("deathtouch", "Deathtouch", "keywords", F::Keyword("deathtouch")),
        CategoryDef::new("lifelink", "Lifelink", "keywords", F::Keyword("lifelink")),
        CategoryDef::new("haste", "Haste", "keywords", F::Keyword("haste")),
        CategoryDef::new("flash", "Flash", "keywords", F::Keyword("flash")),
        CategoryDef::new("power4plus", "Power ≥ 4", "stats", F::PowerAtLeast(4)),
        CategoryDef::new("power1", "Power = 1", "stats", F::Power(1)),
        CategoryDef::new("toughness5plus", "Toughness ≥ 5", "stats", F::ToughnessAtLeast(5)),
    ]
}

/// Bundled card list.
pub fn cards() -> Vec<MtgCard> {
    use Rarity::*;

    vec![
        // White
        MtgCard::new("Serra Angel", "W", "Creature — Angel", 5, Uncommon).keywords(&["Flying", "Vigilance"]).pt(4, 4),
        MtgCard::new("Baneslayer Angel", "W", "Creature — Angel", 5, Mythic).keywords(&["Flying", "First strike", "Lifelink"]).pt(5, 5),
        MtgCard::new("Thalia, Guardian of Thraben", "W", "Legendary Creature — Human Soldier", 2, Rare).keywords(&["First strike"]).pt(2, 1),
        MtgCard::new("Selfless Spirit", "W", "Creature — Spirit Cleric", 2, Rare).keywords(&["Flying"]).pt(2, 1),
        MtgCard::new("Esper Sentinel", "W", "Artifact Creature — Human Soldier", 1, Rare).pt(1, 1),
        MtgCard::new("Portable Hole", "W", "Artifact", 1, Uncommon),
        MtgCard::new("Swords to Plowshares", "W", "Instant", 1, Uncommon),
        MtgCard::new("Wrath of God", "W", "Sorcery", 4, Rare),
        MtgCard::new("Smothering Tithe", "W", "Enchantment", 4, Rare),
        MtgCard::new("Elspeth, Sun's Champion", "W", "Legendary Planeswalker — Elspeth", 6, Mythic),
        MtgCard::new("Archon of Sun's Grace", "W", "Enchantment Creature — Archon", 4, Rare).keywords(&["Flying", "Lifelink"]).pt(3, 4),
        MtgCard::new("Healer's Hawk", "W", "Creature — Bird", 1, Common).keywords(&["Flying", "Lifelink"]).pt(1, 1),
        MtgCard::new("Akroma, Angel of Wrath", "W", "Legendary Creature — Angel", 8, Rare).keywords(&["Flying", "First strike", "Vigilance", "Trample", "Haste"]).pt(6, 6),
        // Blue
        MtgCard::new("Counterspell", "U", "Instant", 2, Common),
        MtgCard::new("Brainstorm", "U", "Instant", 1, Common),
        MtgCard::new("Ponder", "U", "Sorcery", 1, Common),
        MtgCard::new("Snapcaster Mage", "U", "Creature — Human Wizard", 2, Rare).keywords(&["Flash"]).pt(2, 1),
        MtgCard::new("Delver of Secrets", "U", "Creature — Human Wizard", 1, Common).pt(1, 1),
        MtgCard::new("Consecrated Sphinx", "U", "Creature — Sphinx", 6, Mythic).keywords(&["Flying"]).pt(4, 6),
        MtgCard::new("Master Transmuter", "U", "Artifact Creature — Human Artificer", 4, Rare).pt(1, 2),
        MtgCard::new("Rhystic Study", "U", "Enchantment", 3, Common),
        MtgCard::new("Jace, the Mind Sculptor", "U", "Legendary Planeswalker — Jace", 4, Mythic),
        MtgCard::new("Spellstutter Sprite", "U", "Creature — Faerie Wizard", 2, Common).keywords(&["Flash", "Flying"]).pt(1, 1),
        MtgCard::new("Opt", "U", "Instant", 1, Common),
        // Black
        MtgCard::new("Dark Ritual", "B", "Instant", 1, Common),
        MtgCard::new("Thoughtseize", "B", "Sorcery", 1, Rare),
        MtgCard::new("Vampire Nighthawk", "B", "Creature — Vampire Shaman", 3, Uncommon).keywords(&["Flying", "Deathtouch", "Lifelink"]).pt(2, 3),
        MtgCard::new("Gravecrawler", "B", "Creature — Zombie", 1, Rare).pt(2, 1),
        MtgCard::new("Gray Merchant of Asphodel", "B", "Creature — Zombie", 5, Common).pt(2, 4),
        MtgCard::new("Bloodsoaked Champion", "B", "Creature — Human Warrior", 1, Rare).pt(1, 1),
        MtgCard::new("Phyrexian Arena", "B", "Enchantment", 3, Rare),
        MtgCard::new("Liliana of the Veil", "B", "Legendary Planeswalker — Liliana", 3, Mythic),
        MtgCard::new("Typhoid Rats", "B", "Creature — Rat", 1, Common).keywords(&["Deathtouch"]).pt(1, 1),
        MtgCard::new("Vault Skirge", "B", "Artifact Creature — Phyrexian Imp", 2, Common).keywords(&["Flying", "Lifelink"]).pt(1, 1),
        MtgCard::new("Whip of Erebos", "B", "Legendary Enchantment Artifact", 4, Rare),
        // Red
        MtgCard::new("Lightning Bolt", "R", "Instant", 1, Common),
        MtgCard::new("Wheel of Fortune", "R", "Sorcery", 3, Rare),
        MtgCard::new("Goblin Guide", "R", "Creature — Goblin Scout", 1, Rare).keywords(&["Haste"]).pt(2, 2),
        MtgCard::new("Krenko, Mob Boss", "R", "Legendary Creature — Goblin Warrior", 4, Rare).pt(3, 3),
        MtgCard::new("Monastery Swiftspear", "R", "Creature — Human Monk", 1, Uncommon).keywords(&["Haste", "Prowess"]).pt(1, 2),
        MtgCard::new("Shivan Dragon", "R", "Creature — Dragon", 6, Rare).keywords(&["Flying"]).pt(5, 5),
        MtgCard::new("Goblin Bombardment", "R", "Enchantment", 2, Uncommon),
        MtgCard::new("Embercleave", "R", "Legendary Artifact — Equipment", 6, Mythic).keywords(&["Flash", "Equip"]),
        MtgCard::new("Chandra, Torch of Defiance", "R", "Legendary Planeswalker — Chandra", 4, Mythic),
        MtgCard::new("Eidolon of the Great Revel", "R", "Enchantment Creature — Spirit", 2, Rare).pt(2, 2),
        MtgCard::new("Stormbreath Dragon", "R", "Creature — Dragon", 5, Mythic).keywords(&["Flying", "Haste", "Protection"]).pt(4, 4),
        // Green
        MtgCard::new("Llanowar Elves", "G", "Creature — Elf Druid", 1, Common).pt(1, 1),
        MtgCard::new("Elvish Mystic", "G", "Creature — Elf Druid", 1, Common).pt(1, 1),
        MtgCard::new("Colossal Dreadmaw", "G", "Creature — Dinosaur", 6, Common).keywords(&["Trample"]).pt(6, 6),
        MtgCard::new("Craterhoof Behemoth", "G", "Creature — Beast", 8, Mythic).keywords(&["Haste"]).pt(5, 5),
        MtgCard::new("Giant Growth", "G", "Instant", 1, Common),
        MtgCard::new("Cultivate", "G", "Sorcery", 3, Common),
        MtgCard::new("Rancor", "G", "Enchantment — Aura", 1, Uncommon),
        MtgCard::new("Garruk Wildspeaker", "G", "Legendary Planeswalker — Garruk", 4, Mythic),
        MtgCard::new("Birds of Paradise", "G", "Creature — Bird", 1, Rare).keywords(&["Flying"]).pt(0, 1),
        MtgCard::new("Questing Beast", "G", "Legendary Creature — Beast", 4, Mythic).keywords(&["Vigilance", "Deathtouch", "Haste"]).pt(4, 4),
        MtgCard::new("Courser of Kruphix", "G", "Enchantment Creature — Centaur", 3, Rare).pt(2, 4),
        MtgCard::new("Dryad Arbor", "G", "Land Creature — Forest Dryad", 0, Uncommon).pt(1, 1),
        // Multicolour
        MtgCard::new("Kolaghan's Command", "BR", "Instant", 3, Rare),
        MtgCard::new("Knight of the Reliquary", "GW", "Creature — Human Knight", 3, Rare).pt(2, 2),
        MtgCard::new("Niv-Mizzet, Parun", "UR", "Legendary Creature — Dragon Wizard", 6, Rare).keywords(&["Flying"]).pt(5, 5),
        MtgCard::new("Sorin, Vengeful Bloodlord", "WB", "Legendary Planeswalker — Sorin", 4, Rare),
        MtgCard::new("Absorb", "WU", "Instant", 3, Rare),
        MtgCard::new("Teferi, Hero of Dominaria", "WU", "Legendary Planeswalker — Teferi", 5, Mythic),
        MtgCard::new("Baleful Strix", "UB", "Artifact Creature — Bird", 2, Uncommon).keywords(&["Flying", "Deathtouch"]).pt(1, 1),
        MtgCard::new("Thief of Sanity", "UB", "Creature — Specter", 3, Rare).keywords(&["Flying"]).pt(2, 2),
        MtgCard::new("Falkenrath Aristocrat", "BR", "Creature — Vampire", 4, Mythic).keywords(&["Flying", "Haste"]).pt(4, 1),
        MtgCard::new("Rakdos Cackler", "BR", "Creature — Devil", 1, Uncommon).pt(2, 2),
        MtgCard::new("Bloodbraid Elf", "RG", "Creature — Elf Berserker", 4, Uncommon).keywords(&["Cascade", "Haste"]).pt(3, 2),
        MtgCard::new("Rhythm of the Wild", "RG", "Enchantment", 3, Uncommon),
        MtgCard::new("Qasali Pridemage", "GW", "Creature — Cat Wizard", 2, Uncommon).keywords(&["Exalted"]).pt(2, 2),
        MtgCard::new("Lingering Souls", "WB", "Sorcery", 3, Uncommon),
        MtgCard::new("Deathrite Shaman", "BG", "Creature — Elf Shaman", 1, Rare).pt(1, 2),
        MtgCard::new("Assassin's Trophy", "BG", "Instant", 2, Rare),
        MtgCard::new("Lightning Helix", "RW", "Instant", 2, Uncommon),
        MtgCard::new("Boros Reckoner", "RW", "Creature — Minotaur Wizard", 3, Rare).pt(3, 3),
        MtgCard::new("Growth Spiral", "GU", "Instant", 2, Common),
        MtgCard::new("Uro, Titan of Nature's Wrath", "GU", "Legendary Creature — Elder Giant", 3, Mythic).pt(6, 6),
        MtgCard::new("Sprite Dragon", "UR", "Creature — Faerie Dragon", 2, Uncommon).keywords(&["Flying", "Haste"]).pt(1, 1),
        // Colourless
        MtgCard::new("Sol Ring", "", "Artifact", 1, Uncommon),
        MtgCard::new("Ornithopter", "", "Artifact Creature — Thopter", 0, Common).keywords(&["Flying"]).pt(0, 2),
        MtgCard::new("Wurmcoil Engine", "", "Artifact Creature — Phyrexian Wurm", 6, Mythic).keywords(&["Deathtouch", "Lifelink"]).pt(6, 6),
        MtgCard::new("Emrakul, the Aeons Torn", "", "Legendary Creature — Eldrazi", 15, Mythic).keywords(&["Flying", "Annihilator"]).pt(15, 15),
        MtgCard::new("Command Tower", "", "Land", 0, Common),
        MtgCard::new("Sacred Foundry", "", "Land — Mountain Plains", 0, Rare),
        MtgCard::new("Bomat Courier", "", "Artifact Creature — Construct", 1, Rare).keywords(&["Haste"]).pt(1, 1),
        MtgCard::new("Darksteel Citadel", "", "Artifact Land", 0, Common),
        MtgCard::new("Urza's Saga", "", "Enchantment Land — Urza's Saga", 0, Rare),
    ]
}

/// Catalog with the bundled cards, generating from [`GENERATION_POOL`].
///
/// Fallback grid: White / Blue / Red against Creature / Enchantment /
/// Artifact.
pub fn catalog() -> Result<MtgCatalog, PuzzleError> {
    Ok(LocalCatalog::new(
        Domain::Mtg,
        categories(),
        cards(),
        PuzzleIds::new(["white", "blue", "red"], ["creature", "enchantment", "artifact"]),
    )?
    .with_generation_pool(GENERATION_POOL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryAdapter, CategoryId};

    fn check(filter: MtgFilter, name: &str) -> bool {
        let card = cards().into_iter().find(|c| c.name == name).unwrap();
        filter.matches(&card)
    }

    #[test]
    fn test_filters() {
        assert!(check(MtgFilter::Color('U'), "Niv-Mizzet, Parun"));
        assert!(check(MtgFilter::Multicolor, "Niv-Mizzet, Parun"));
        assert!(check(MtgFilter::TypeWord("wizard"), "Niv-Mizzet, Parun"));
        assert!(check(MtgFilter::TypeWord("human"), "Snapcaster Mage"));
        assert!(check(MtgFilter::Colorless, "Sol Ring"));
        assert!(!check(MtgFilter::Multicolor, "Sol Ring"));
        assert!(check(MtgFilter::Keyword("first strike"), "Thalia, Guardian of Thraben"));
        assert!(check(MtgFilter::ToughnessAtLeast(5), "Wurmcoil Engine"));
        assert!(!check(MtgFilter::PowerAtLeast(1), "Sol Ring"));
        assert!(check(MtgFilter::ManaValueAtLeast(6), "Emrakul, the Aeons Torn"));
    }

    #[test]
    fn test_type_words_split_on_dash() {
        let card = cards().into_iter().find(|c| c.name == "Esper Sentinel").unwrap();
        let words: Vec<String> = card.type_words().collect();
        assert_eq!(words, vec!["artifact", "creature", "human", "soldier"]);
    }

    #[test]
    fn test_fallback_is_solvable() {
        let catalog = catalog().unwrap();
        let fallback = catalog.fallback_puzzle();
        for (_, row, col) in fallback.intersections() {
            assert!(!catalog.answers(&row.id, &col.id).is_empty(), "{} x {}", row.id, col.id);
        }
        assert_eq!(fallback.rows[2].id, CategoryId::new("red"));
    }

    #[test]
    fn test_every_category_has_an_answer() {
        let catalog = catalog().unwrap();
        for def in categories() {
            let id = &def.category.id;
            assert!(!catalog.answers(id, id).is_empty(), "no card for {id}");
        }
    }

    #[tokio::test]
    async fn test_name_resolution_is_case_insensitive() {
        let catalog = catalog().unwrap();
        let card = catalog.resolve_entity("lightning BOLT").await.unwrap().unwrap();
        assert_eq!(card.name, "Lightning Bolt");
        assert!(catalog.resolve_entity("Lightning").await.unwrap().is_none());
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

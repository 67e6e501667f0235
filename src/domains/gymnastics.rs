//! Women's Artistic Gymnastics
//!
//! Entities are skills. Categories are chosen so that most cross-group pairs
//! have answers; the ones that never can (vault dance elements, floor
//! Yurchenkos) are declared in [`incompatible_pairs`] and skipped without a
//! scan.
//!
//! Name lookup is forgiving: exact name, then the name without its
//! `(Beam)`-style suffix, then any skill whose name contains the query or
//! whose id contains the hyphenated query.

use serde::{Serialize, Deserialize};

use crate::category::{CategoryDef, Domain, Entity, EntityFilter, ExclusionMatrix};
use crate::puzzle::{PuzzleError, PuzzleIds};

use super::catalog::LocalCatalog;

/// Local gymnastics catalog.
pub type GymCatalog = LocalCatalog<Skill, SkillFilter>;

/// Categories offered to the daily generator.
///
/// Apparatus-bound skill types, vault families, bars and piked skills leave
/// too many empty cells when they land in a random grid.
pub const GENERATION_POOL: &[&str] = &[
    "floor", "beam", "vault",
    "forward", "backward",
    "tucked", "layout",
    "twist", "multiflip", "named",
    "acrobatic", "dismount",
];

// =============================================================================
// SKILLS
// =============================================================================

/// Competition apparatus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Apparatus {
    /// Floor exercise
    Floor,
    /// Balance beam
    Beam,
    /// Uneven bars
    Bars,
    /// Vault
    Vault,
}

/// Element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    /// Tumbling, walkovers, saltos
    Acrobatic,
    /// Leaps, jumps, turns
    Dance,
    /// Bar circles and swings
    Swing,
    /// Bar release moves
    Release,
    /// Dismounts
    Dismount,
    /// Vaults
    Vault,
}

/// Rotation direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward
    Forward,
    /// Backward
    Backward,
}

/// Body position in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Tucked
    Tucked,
    /// Piked
    Piked,
    /// Layout
    Layout,
}

/// Vault entry family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultFamily {
    /// Round-off entry
    Yurchenko,
    /// Quarter/half turn entry
    Tsukahara,
    /// Front handspring entry
    Handspring,
}

/// One gymnastics skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Stable slug, e.g. `back-full`
    pub id: String,
    /// Display name
    pub name: String,
    /// Apparatus
    pub apparatus: Apparatus,
    /// Element type
    pub kind: SkillType,
    /// Rotation direction, if any
    pub direction: Option<Direction>,
    /// Body position, if any
    pub position: Option<Position>,
    /// Includes a twist
    pub twist: bool,
    /// Double or triple salto
    pub multiflip: bool,
    /// Named after a gymnast
    pub named: bool,
    /// Vault family, vaults only
    pub family: Option<VaultFamily>,
}

impl Skill {
    fn new(id: &str, name: &str, apparatus: Apparatus, kind: SkillType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            apparatus,
            kind,
            direction: None,
            position: None,
            twist: false,
            multiflip: false,
            named: false,
            family: None,
        }
    }

    fn dir(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    fn pos(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    fn twist(mut self) -> Self {
        self.twist = true;
        self
    }

    fn multi(mut self) -> Self {
        self.multiflip = true;
        self
    }

    fn named(mut self) -> Self {
        self.named = true;
        self
    }

    fn family(mut self, family: VaultFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Name with any parenthetical suffix removed: `Handstand (Beam)` → `Handstand`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut depth = 0usize;
        for c in self.name.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ if depth == 0 => out.push(c),
                _ => {}
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Entity for Skill {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> Vec<String> {
        vec![self.short_name()]
    }

    fn search_keys(&self) -> Vec<String> {
        vec![self.name.to_lowercase(), self.id.clone()]
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Behaviour of a gymnastics category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillFilter {
    /// Performed on this apparatus
    Apparatus(Apparatus),
    /// Rotates this way
    Direction(Direction),
    /// Held in this position
    Position(Position),
    /// Has a twist
    Twist,
    /// Double or triple salto
    Multiflip,
    /// Named skill
    Named,
    /// Acrobatic element (vaults count)
    Acrobatic,
    /// Exactly this element type
    Kind(SkillType),
    /// Vault family
    Family(VaultFamily),
}

impl EntityFilter<Skill> for SkillFilter {
    fn matches(&self, skill: &Skill) -> bool {
        match *self {
            SkillFilter::Apparatus(a) => skill.apparatus == a,
            SkillFilter::Direction(d) => skill.direction == Some(d),
            SkillFilter::Position(p) => skill.position == Some(p),
            SkillFilter::Twist => skill.twist,
            SkillFilter::Multiflip => skill.multiflip,
            SkillFilter::Named => skill.named,
            SkillFilter::Acrobatic => matches!(skill.kind, SkillType::Acrobatic | SkillType::Vault),
            SkillFilter::Kind(k) => skill.kind == k,
            SkillFilter::Family(f) => skill.family == Some(f),
        }
    }
}

/// Every gymnastics category.
pub fn categories() -> Vec<CategoryDef<SkillFilter>> {
    use SkillFilter as F;

    vec![
        CategoryDef::new("floor", "Floor", "apparatus", F::Apparatus(Apparatus::Floor)),
        CategoryDef::new("beam", "Beam", "apparatus", F::Apparatus(Apparatus::Beam)),
        CategoryDef::new("bars", "Bars", "apparatus", F::Apparatus(Apparatus::Bars)),
        CategoryDef::new("vault", "Vault", "apparatus", F::Apparatus(Apparatus::Vault)),
        CategoryDef::new("forward", "Forward", "direction", F::Direction(Direction::Forward)),
        CategoryDef::new("backward", "Backward", "direction", F::Direction(Direction::Backward)),
        CategoryDef::new("tucked", "Tucked", "position", F::Position(Position::Tucked)),
        CategoryDef::new("piked", "Piked", "position", F::Position(Position::Piked)),
        CategoryDef::new("layout", "Layout", "position", F::Position(Position::Layout)),
        CategoryDef::new("twist", "Has Twist", "characteristics", F::Twist),
        CategoryDef::new("multiflip", "Double/Triple", "characteristics", F::Multiflip),
        CategoryDef::new("named", "Named Skill", "characteristics", F::Named),
        CategoryDef::new("acrobatic", "Acrobatic", "skillType", F::Acrobatic),
        CategoryDef::new("dance", "Dance", "skillType", F::Kind(SkillType::Dance)),
        CategoryDef::new("swing", "Swing", "skillType", F::Kind(SkillType::Swing)),
        CategoryDef::new("release", "Release", "skillType", F::Kind(SkillType::Release)),
        CategoryDef::new("dismount", "Dismount", "skillType", F::Kind(SkillType::Dismount)),
        CategoryDef::new("yurchenko", "Yurchenko", "vaultFamily", F::Family(VaultFamily::Yurchenko)),
        CategoryDef::new("tsukahara", "Tsukahara", "vaultFamily", F::Family(VaultFamily::Tsukahara)),
        CategoryDef::new("handspring", "Handspring", "vaultFamily", F::Family(VaultFamily::Handspring)),
    ]
}

/// Pairs that can never share a skill.
pub fn incompatible_pairs() -> ExclusionMatrix {
    ExclusionMatrix::from_pairs([
        ("vault", "dance"),
        ("vault", "swing"),
        ("vault", "release"),
        ("bars", "dance"),
        ("floor", "yurchenko"),
        ("floor", "tsukahara"),
        ("floor", "handspring"),
        ("beam", "yurchenko"),
        ("beam", "tsukahara"),
        ("beam", "handspring"),
        ("bars", "yurchenko"),
        ("bars", "tsukahara"),
        ("bars", "handspring"),
    ])
}

/// Bundled skill list.
pub fn skills() -> Vec<Skill> {
    use Apparatus::*;
    use Direction::*;
    use Position::*;
    use VaultFamily::*;

    let acro = SkillType::Acrobatic;
    let dance = SkillType::Dance;
    let swing = SkillType::Swing;
    let release = SkillType::Release;
    let dismount = SkillType::Dismount;
    let vault = SkillType::Vault;

    vec![
        // Floor
        Skill::new("handstand", "Handstand", Floor, acro),
        Skill::new("cartwheel", "Cartwheel", Floor, acro),
        Skill::new("roundoff", "Roundoff", Floor, acro),
        Skill::new("front-handspring", "Front Handspring", Floor, acro).dir(Forward),
        Skill::new("back-handspring", "Back Handspring", Floor, acro).dir(Backward),
        Skill::new("front-walkover", "Front Walkover", Floor, acro).dir(Forward),
        Skill::new("back-walkover", "Back Walkover", Floor, acro).dir(Backward),
        Skill::new("front-aerial", "Front Aerial", Floor, acro).dir(Forward),
        Skill::new("front-tuck", "Front Tuck", Floor, acro).dir(Forward).pos(Tucked),
        Skill::new("front-pike", "Front Pike", Floor, acro).dir(Forward).pos(Piked),
        Skill::new("front-layout", "Front Layout", Floor, acro).dir(Forward).pos(Layout),
        Skill::new("front-full", "Front Full", Floor, acro).dir(Forward).pos(Layout).twist(),
        Skill::new("double-front-tuck", "Double Front Tuck", Floor, acro).dir(Forward).pos(Tucked).multi(),
        Skill::new("double-front-pike", "Double Front Pike", Floor, acro).dir(Forward).pos(Piked).multi(),
        Skill::new("back-tuck", "Back Tuck", Floor, acro).dir(Backward).pos(Tucked),
        Skill::new("back-pike", "Back Pike", Floor, acro).dir(Backward).pos(Piked),
        Skill::new("back-layout", "Back Layout", Floor, acro).dir(Backward).pos(Layout),
        Skill::new("whip-back", "Whip Back", Floor, acro).dir(Backward).pos(Layout),
        Skill::new("back-full", "Full Twist", Floor, acro).dir(Backward).pos(Layout).twist(),
        Skill::new("double-full", "Double Full", Floor, acro).dir(Backward).pos(Layout).twist(),
        Skill::new("triple-full", "Triple Full", Floor, acro).dir(Backward).pos(Layout).twist(),
        Skill::new("double-back-tuck", "Double Back Tuck", Floor, acro).dir(Backward).pos(Tucked).multi(),
        Skill::new("double-back-pike", "Double Back Pike", Floor, acro).dir(Backward).pos(Piked).multi(),
        Skill::new("double-back-layout", "Double Back Layout", Floor, acro).dir(Backward).pos(Layout).multi(),
        Skill::new("full-in", "Full-In Back Out", Floor, acro).dir(Backward).pos(Tucked).multi().twist(),
        Skill::new("double-double", "Double Double", Floor, acro).dir(Backward).pos(Tucked).multi().twist().named(),
        Skill::new("triple-double", "Triple Double (Biles II)", Floor, acro).dir(Backward).pos(Tucked).multi().twist().named(),
        Skill::new("arabian", "Arabian", Floor, acro).dir(Forward).pos(Tucked).twist(),
        Skill::new("arabian-double", "Arabian Double Front", Floor, acro).dir(Forward).pos(Piked).multi().twist(),
        Skill::new("split-leap", "Split Leap", Floor, dance),
        Skill::new("switch-leap", "Switch Leap", Floor, dance),
        Skill::new("switch-half", "Switch Half", Floor, dance).twist(),
        Skill::new("tour-jete", "Tour Jeté", Floor, dance).twist(),
        Skill::new("sheep-jump", "Sheep Jump", Floor, dance),
        Skill::new("popa", "Popa", Floor, dance).named(),
        Skill::new("full-turn", "Full Turn", Floor, dance).twist(),
        Skill::new("double-turn", "Double Turn", Floor, dance).twist(),
        Skill::new("wolf-turn", "Wolf Turn", Floor, dance).twist(),
        Skill::new("illusion-turn", "Illusion Turn", Floor, dance).twist(),
        // Beam
        Skill::new("beam-handstand", "Handstand (Beam)", Beam, acro),
        Skill::new("beam-cartwheel", "Cartwheel (Beam)", Beam, acro),
        Skill::new("beam-bhs", "Back Handspring (Beam)", Beam, acro).dir(Backward),
        Skill::new("beam-front-walkover", "Front Walkover (Beam)", Beam, acro).dir(Forward),
        Skill::new("beam-back-walkover", "Back Walkover (Beam)", Beam, acro).dir(Backward),
        Skill::new("beam-front-aerial", "Front Aerial (Beam)", Beam, acro).dir(Forward),
        Skill::new("beam-back-tuck", "Back Tuck (Beam)", Beam, acro).dir(Backward).pos(Tucked),
        Skill::new("beam-back-layout", "Back Layout (Beam)", Beam, acro).dir(Backward).pos(Layout),
        Skill::new("beam-back-full", "Standing Full (Beam)", Beam, acro).dir(Backward).pos(Layout).twist(),
        Skill::new("onodi", "Onodi", Beam, acro).dir(Backward).twist().named(),
        Skill::new("gainer-layout", "Gainer Layout", Beam, acro).dir(Backward).pos(Layout),
        Skill::new("korbut-flip", "Korbut Flip", Beam, acro).dir(Backward).named(),
        Skill::new("beam-split-leap", "Split Leap (Beam)", Beam, dance),
        Skill::new("beam-switch-leap", "Switch Leap (Beam)", Beam, dance),
        Skill::new("beam-full-turn", "Full Turn (Beam)", Beam, dance).twist(),
        Skill::new("beam-wolf-turn", "Wolf Turn (Beam)", Beam, dance).twist(),
        Skill::new("beam-roundoff-dismount", "Roundoff Dismount", Beam, dismount),
        Skill::new("beam-back-full-dismount", "Full Twist Dismount", Beam, dismount).dir(Backward).pos(Layout).twist(),
        Skill::new("beam-double-back-dismount", "Double Back Dismount", Beam, dismount).dir(Backward).pos(Tucked).multi(),
        Skill::new("beam-double-pike-dismount", "Double Pike Dismount", Beam, dismount).dir(Backward).pos(Piked).multi(),
        Skill::new("beam-full-in-dismount", "Full-In Dismount", Beam, dismount).dir(Backward).multi().twist(),
        Skill::new("patterson", "Patterson", Beam, dismount).dir(Forward).pos(Piked).multi().twist().named(),
        // Bars
        Skill::new("kip", "Kip", Bars, swing),
        Skill::new("glide-kip", "Glide Kip", Bars, swing),
        Skill::new("cast-handstand", "Cast to Handstand", Bars, swing),
        Skill::new("giant", "Giant Swing", Bars, swing),
        Skill::new("giant-full", "Giant Full", Bars, swing).twist(),
        Skill::new("clear-hip", "Clear Hip Circle", Bars, swing),
        Skill::new("stalder", "Stalder Circle", Bars, swing),
        Skill::new("toe-on", "Toe-On Circle", Bars, swing),
        Skill::new("pirouette", "Pirouette", Bars, swing).twist(),
        Skill::new("blind-change", "Blind Change", Bars, swing).twist(),
        Skill::new("healy", "Healy", Bars, swing).twist().named(),
        Skill::new("pak-salto", "Pak Salto", Bars, release).dir(Backward).named(),
        Skill::new("bail", "Bail", Bars, release).dir(Backward),
        Skill::new("tkachev", "Tkachev", Bars, release).dir(Backward).named(),
        Skill::new("jaeger", "Jaeger", Bars, release).dir(Forward).named(),
        Skill::new("gienger", "Gienger", Bars, release).dir(Backward).twist().named(),
        Skill::new("shaposhnikova", "Shaposhnikova", Bars, release).dir(Forward).named(),
        Skill::new("maloney", "Maloney", Bars, release).dir(Forward).named(),
        Skill::new("flyaway", "Flyaway", Bars, dismount).dir(Backward).pos(Layout),
        Skill::new("flyaway-full", "Full Twisting Flyaway", Bars, dismount).dir(Backward).pos(Layout).twist(),
        Skill::new("double-flyaway", "Double Back Dismount", Bars, dismount).dir(Backward).pos(Tucked).multi(),
        Skill::new("double-layout-dismount", "Double Layout Dismount", Bars, dismount).dir(Backward).pos(Layout).multi(),
        Skill::new("double-pike-flyaway", "Double Pike Flyaway", Bars, dismount).dir(Backward).pos(Piked).multi(),
        Skill::new("double-front-dismount", "Double Front Dismount", Bars, dismount).dir(Forward).pos(Tucked).multi(),
        // Vault
        Skill::new("handspring-vault", "Handspring Vault", Vault, vault).dir(Forward).family(Handspring),
        Skill::new("handspring-front", "Handspring Front Tuck", Vault, vault).dir(Forward).pos(Tucked).family(Handspring),
        Skill::new("handspring-front-pike", "Handspring Front Pike", Vault, vault).dir(Forward).pos(Piked).family(Handspring),
        Skill::new("handspring-full", "Handspring Full", Vault, vault).dir(Forward).pos(Layout).twist().family(Handspring),
        Skill::new("handspring-double-front", "Handspring Double Front", Vault, vault).dir(Forward).pos(Tucked).multi().family(Handspring),
        Skill::new("rudi", "Rudi", Vault, vault).dir(Forward).pos(Layout).twist().family(Handspring).named(),
        Skill::new("cheng", "Cheng", Vault, vault).dir(Forward).pos(Layout).twist().family(Handspring).named(),
        Skill::new("produnova", "Produnova", Vault, vault).dir(Forward).pos(Tucked).multi().family(Handspring).named(),
        Skill::new("tsukahara", "Tsukahara", Vault, vault).dir(Backward).pos(Tucked).family(Tsukahara).named(),
        Skill::new("tsukahara-pike", "Tsukahara Pike", Vault, vault).dir(Backward).pos(Piked).family(Tsukahara),
        Skill::new("tsukahara-layout", "Tsukahara Layout", Vault, vault).dir(Backward).pos(Layout).family(Tsukahara),
        Skill::new("tsukahara-full", "Tsukahara Full", Vault, vault).dir(Backward).pos(Layout).twist().family(Tsukahara),
        Skill::new("tsukahara-double", "Tsukahara Double", Vault, vault).dir(Backward).pos(Tucked).multi().family(Tsukahara),
        Skill::new("kasamatsu", "Kasamatsu", Vault, vault).dir(Backward).pos(Layout).twist().family(Tsukahara).named(),
        Skill::new("yurchenko", "Yurchenko", Vault, vault).dir(Backward).pos(Tucked).family(Yurchenko).named(),
        Skill::new("yurchenko-pike", "Yurchenko Pike", Vault, vault).dir(Backward).pos(Piked).family(Yurchenko),
        Skill::new("yurchenko-layout", "Yurchenko Layout", Vault, vault).dir(Backward).pos(Layout).family(Yurchenko),
        Skill::new("yurchenko-full", "Yurchenko Full", Vault, vault).dir(Backward).pos(Layout).twist().family(Yurchenko),
        Skill::new("yurchenko-double", "Yurchenko Double", Vault, vault).dir(Backward).pos(Tucked).multi().family(Yurchenko),
        Skill::new("amanar", "Amanar", Vault, vault).dir(Backward).pos(Layout).twist().family(Yurchenko).named(),
        Skill::new("biles-vault", "Biles (Vault)", Vault, vault).dir(Backward).pos(Piked).multi().family(Yurchenko).named(),
    ]
}

/// Catalog with the bundled skills, exclusion table and partial lookups.
///
/// Fallback grid: Floor / Beam / Vault against Forward / Backward / Has Twist.
pub fn catalog() -> Result<GymCatalog, PuzzleError> {
    Ok(LocalCatalog::new(
        Domain::Gymnastics,
        categories(),
        skills(),
        PuzzleIds::new(["floor", "beam", "vault"], ["forward", "backward", "twist"]),
    )?
    .with_exclusions(incompatible_pairs())?
    .with_generation_pool(GENERATION_POOL)
    .with_partial_match())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryAdapter, CategoryId};

    async fn resolve(catalog: &GymCatalog, query: &str) -> Option<String> {
        catalog.resolve_entity(query).await.unwrap().map(|s| s.id)
    }

    #[test]
    fn test_short_name() {
        let skill = Skill::new("x", "Triple Double (Biles II)", Apparatus::Floor, SkillType::Acrobatic);
        assert_eq!(skill.short_name(), "Triple Double");
    }

    #[tokio::test]
    async fn test_lookup_order() {
        let catalog = catalog().unwrap();
        // Exact
        assert_eq!(resolve(&catalog, "Handstand (Beam)").await.as_deref(), Some("beam-handstand"));
        // Exact beats the suffix-stripped beam skill
        assert_eq!(resolve(&catalog, "handstand").await.as_deref(), Some("handstand"));
        // Suffix stripped
        assert_eq!(resolve(&catalog, "Standing Full").await.as_deref(), Some("beam-back-full"));
        // Partial on name
        assert_eq!(resolve(&catalog, "produ").await.as_deref(), Some("produnova"));
        // Partial on hyphenated id
        assert_eq!(resolve(&catalog, "beam bhs").await.as_deref(), Some("beam-bhs"));
        assert_eq!(resolve(&catalog, "quadruple layout").await, None);
    }

    #[tokio::test]
    async fn test_vault_dance_skips_scan() {
        let catalog = catalog().unwrap();
        let vault = catalog.category(&CategoryId::new("vault")).unwrap();
        let dance = catalog.category(&CategoryId::new("dance")).unwrap();
        assert!(catalog.exclusions().forbids(&dance.id, &vault.id));
        assert!(!catalog.is_compatible(&vault, &dance).await.unwrap());
    }

    #[test]
    fn test_vaults_count_as_acrobatic() {
        let amanar = skills().into_iter().find(|s| s.id == "amanar").unwrap();
        assert!(SkillFilter::Acrobatic.matches(&amanar));
        assert!(!SkillFilter::Kind(SkillType::Acrobatic).matches(&amanar));
    }

    #[test]
    fn test_fallback_is_solvable() {
        let catalog = catalog().unwrap();
        for (_, row, col) in catalog.fallback_puzzle().intersections() {
            let pair_ok = !catalog.exclusions().forbids(&row.id, &col.id);
            assert!(pair_ok && !catalog.answers(&row.id, &col.id).is_empty(), "{} x {}", row.id, col.id);
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

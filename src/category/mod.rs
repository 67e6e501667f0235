//! Categories and the adapter boundary.
//!
//! A [`Category`] is plain data (id, label, group). Its behaviour lives in a
//! per-domain [`CategoryRegistry`] keyed by id, so persisted puzzles only ever
//! carry ids and are rehydrated on load.
//!
//! ## Module Structure
//!
//! - `registry`: static id → filter registry
//! - `exclusion`: declarative "never compatible" pairs
//! - `adapter`: the [`CategoryAdapter`] trait every domain implements
//! - `rate_limit`: request spacing for remote oracles

pub mod registry;
pub mod exclusion;
pub mod adapter;
pub mod rate_limit;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use serde::{Serialize, Deserialize};

pub use registry::{CategoryDef, CategoryRegistry, EntityFilter};
pub use exclusion::ExclusionMatrix;
pub use adapter::{AdapterError, CategoryAdapter, Entity, entity_key};
pub use rate_limit::{RateLimiter, RateLimitedAdapter};

// =============================================================================
// DOMAIN
// =============================================================================

/// A supported game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Magic: The Gathering
    Mtg,
    /// Flesh and Blood
    Fab,
    /// Women's artistic gymnastics skills
    Gymnastics,
}

impl Domain {
    /// Every domain, in display order.
    pub const ALL: [Domain; 3] = [Domain::Mtg, Domain::Fab, Domain::Gymnastics];

    /// Stable identifier used in storage keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Mtg => "mtg",
            Domain::Fab => "fab",
            Domain::Gymnastics => "gymnastics",
        }
    }

    /// Parse a domain identifier (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mtg" => Some(Domain::Mtg),
            "fab" => Some(Domain::Fab),
            "gymnastics" | "gym" => Some(Domain::Gymnastics),
            _ => None,
        }
    }

    /// Full game name.
    pub fn display_name(self) -> &'static str {
        match self {
            Domain::Mtg => "Magic: The Gathering",
            Domain::Fab => "Flesh and Blood",
            Domain::Gymnastics => "Gymnastics",
        }
    }

    /// Puzzle brand name.
    pub fn short_name(self) -> &'static str {
        match self {
            Domain::Mtg => "MTGDoku",
            Domain::Fab => "FABDoku",
            Domain::Gymnastics => "GymDoku",
        }
    }

    /// Icon shown next to the game name.
    pub fn emoji(self) -> &'static str {
        match self {
            Domain::Mtg => "🎴",
            Domain::Fab => "⚔️",
            Domain::Gymnastics => "🤸",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// IDS
// =============================================================================

/// Category identifier, unique within a domain.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Create from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Coarse classification of categories ("colors", "pitch", "apparatus").
///
/// No two rows, and no two columns, of a generated puzzle share a group.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    /// Create from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CATEGORY
// =============================================================================

/// A named filter over a domain's entities, without its behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique id within the domain
    pub id: CategoryId,
    /// Display text
    pub label: String,
    /// Axis-exclusivity group
    pub group: GroupId,
}

impl Category {
    /// Create a category.
    pub fn new(id: impl Into<String>, label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            label: label.into(),
            group: GroupId::new(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parse_roundtrip() {
        for domain in Domain::ALL {
            assert_eq!(Domain::parse(domain.as_str()), Some(domain));
        }
        assert_eq!(Domain::parse(" GYM "), Some(Domain::Gymnastics));
        assert_eq!(Domain::parse("pokemon"), None);
    }

    #[test]
    fn test_category_serializes_flat_ids() {
        let cat = Category::new("white", "White", "colors");
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["id"], "white");
        assert_eq!(json["group"], "colors");
    }

    #[test]
    fn test_domain_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Domain::Fab).unwrap(), "\"fab\"");
    }
}

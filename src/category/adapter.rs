//! Category Adapter Boundary
//!
//! The generator and the session only ever talk to a domain through
//! [`CategoryAdapter`]. Whether compatibility is answered from an in-memory
//! card list or a remote search API is the adapter's business.
//!
//! Adapters report collaborator failures as [`AdapterError`]; the core turns
//! every such error into "incompatible" / "does not match" / "not found".

use async_trait::async_trait;
use thiserror::Error;

use super::{Category, CategoryId, Domain, ExclusionMatrix};
use crate::puzzle::Puzzle;

static NO_EXCLUSIONS: ExclusionMatrix = ExclusionMatrix::new();

/// Failures reported by a domain adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Backend could not be reached.
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer in time.
    #[error("Oracle timed out")]
    Timeout,

    /// Category id not known to this domain.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),
}

/// Something a player can guess: a card or a skill.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Display name. Its lowercase form is the entity's identity.
    fn name(&self) -> &str;

    /// Extra exact names, consulted only after every entity's primary name.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Keys searched by substring when a domain allows partial lookups.
    fn search_keys(&self) -> Vec<String> {
        vec![self.name().to_lowercase()]
    }
}

/// Normalised identity used for the "no reuse" rule.
pub fn entity_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Per-domain supplier of categories and the compatibility oracle.
#[async_trait]
pub trait CategoryAdapter: Send + Sync {
    /// Entity type players guess in this domain.
    type Entity: Entity;

    /// Which game this adapter serves.
    fn domain(&self) -> Domain;

    /// Category pool used for daily generation.
    fn all_categories(&self) -> Vec<Category>;

    /// Look up any category this domain knows, including ones outside the
    /// generation pool.
    fn category(&self, id: &CategoryId) -> Option<Category> {
        self.all_categories().into_iter().find(|cat| &cat.id == id)
    }

    /// Does at least one entity satisfy both categories?
    async fn is_compatible(&self, a: &Category, b: &Category) -> Result<bool, AdapterError>;

    /// Does `entity` satisfy `category`?
    async fn matches(&self, entity: &Self::Entity, category: &Category) -> Result<bool, AdapterError>;

    /// Resolve free text to an entity.
    async fn resolve_entity(&self, name: &str) -> Result<Option<Self::Entity>, AdapterError>;

    /// Hand-picked puzzle that is always valid.
    fn fallback_puzzle(&self) -> Puzzle;

    /// Pairs the generator may reject without consulting the oracle.
    fn exclusions(&self) -> &ExclusionMatrix {
        &NO_EXCLUSIONS
    }
}

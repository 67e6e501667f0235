//! Hidden Categories
//!
//! Operators can pull categories out of daily generation without touching the
//! domain data. The list is read once per generated puzzle.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::StoreError;
use crate::category::{CategoryId, Domain};

/// Source of per-domain excluded category ids.
#[async_trait]
pub trait HiddenCategories: Send + Sync {
    /// Ids to leave out of generation for `domain`.
    async fn get(&self, domain: Domain) -> Result<Vec<CategoryId>, StoreError>;
}

/// Fixed hidden lists, configured up front.
#[derive(Debug, Clone, Default)]
pub struct StaticHiddenCategories {
    hidden: BTreeMap<Domain, Vec<CategoryId>>,
}

impl StaticHiddenCategories {
    /// Nothing hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide `ids` in `domain`.
    pub fn with(mut self, domain: Domain, ids: &[&str]) -> Self {
        self.hidden
            .entry(domain)
            .or_default()
            .extend(ids.iter().map(|id| CategoryId::new(*id)));
        self
    }
}

#[async_trait]
impl HiddenCategories for StaticHiddenCategories {
    async fn get(&self, domain: Domain) -> Result<Vec<CategoryId>, StoreError> {
        Ok(self.hidden.get(&domain).cloned().unwrap_or_default())
    }
}

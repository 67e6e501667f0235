//! Static Category Registry
//!
//! Maps category ids to their behaviour. Filters never leave the process:
//! anything persisted refers to a category by id and is looked up here.

use std::collections::BTreeMap;
use tracing::warn;

use super::{Category, CategoryId, GroupId};

/// Predicate over one domain's entity type.
pub trait EntityFilter<E>: Send + Sync {
    /// Does `entity` satisfy this filter?
    fn matches(&self, entity: &E) -> bool;
}

/// A category together with its filter.
#[derive(Clone, Debug)]
pub struct CategoryDef<F> {
    /// Persistable part
    pub category: Category,
    /// Behaviour
    pub filter: F,
}

impl<F> CategoryDef<F> {
    /// Define a category.
    pub fn new(id: &str, label: &str, group: &str, filter: F) -> Self {
        Self {
            category: Category::new(id, label, group),
            filter,
        }
    }
}

/// Id-indexed collection of category definitions, in declaration order.
#[derive(Clone, Debug)]
pub struct CategoryRegistry<F> {
    defs: Vec<CategoryDef<F>>,
    index: BTreeMap<CategoryId, usize>,
}

impl<F> CategoryRegistry<F> {
    /// Build a registry. A repeated id keeps its first definition.
    pub fn new(defs: Vec<CategoryDef<F>>) -> Self {
        let mut kept = Vec::with_capacity(defs.len());
        let mut index = BTreeMap::new();

        for def in defs {
            if index.contains_key(&def.category.id) {
                warn!(id = %def.category.id, "duplicate category id ignored");
                continue;
            }
            index.insert(def.category.id.clone(), kept.len());
            kept.push(def);
        }

        Self { defs: kept, index }
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &CategoryId) -> Option<&CategoryDef<F>> {
        self.index.get(id).map(|&i| &self.defs[i])
    }

    /// Look up the data part of a category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.get(id).map(|def| &def.category)
    }

    /// All categories, in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        self.defs.iter().map(|def| def.category.clone()).collect()
    }

    /// Categories belonging to `group`, in declaration order.
    pub fn group<'a>(&'a self, group: &'a GroupId) -> impl Iterator<Item = &'a Category> + 'a {
        self.defs
            .iter()
            .map(|def| &def.category)
            .filter(move |cat| &cat.group == group)
    }

    /// Number of registered categories.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

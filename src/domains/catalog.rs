//! In-Memory Catalog Adapter
//!
//! Answers every oracle question by scanning a local entity list against the
//! domain's static category registry. Used by all built-in domains.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::category::{
    entity_key, AdapterError, Category, CategoryAdapter, CategoryDef, CategoryId,
    CategoryRegistry, Domain, Entity, EntityFilter, ExclusionMatrix,
};
use crate::puzzle::{Puzzle, PuzzleError, PuzzleIds};

/// Local entity list plus its category registry.
pub struct LocalCatalog<E, F> {
    domain: Domain,
    registry: CategoryRegistry<F>,
    pool: Vec<CategoryId>,
    entities: Vec<E>,
    names: BTreeMap<String, usize>,
    partial_match: bool,
    exclusions: ExclusionMatrix,
    fallback: Puzzle,
}

impl<E: Entity, F: EntityFilter<E>> LocalCatalog<E, F> {
    /// Build a catalog and check that `fallback` is fully solvable.
    ///
    /// The generation pool defaults to every registered category.
    pub fn new(
        domain: Domain,
        defs: Vec<CategoryDef<F>>,
        entities: Vec<E>,
        fallback: PuzzleIds,
    ) -> Result<Self, PuzzleError> {
        let registry = CategoryRegistry::new(defs);
        let fallback = fallback.rehydrate(|id| registry.category(id).cloned())?;
        let names = index_names(&entities);

        let catalog = Self {
            domain,
            pool: Vec::new(),
            registry,
            entities,
            names,
            partial_match: false,
            exclusions: ExclusionMatrix::new(),
            fallback,
        };

        catalog.check_fallback()?;

        debug!(
            %domain,
            categories = catalog.registry.len(),
            entities = catalog.entities.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Restrict generation to these ids (unknown ids are ignored).
    pub fn with_generation_pool(mut self, ids: &[&str]) -> Self {
        self.pool = ids.iter().map(|id| CategoryId::new(*id)).collect();
        self
    }

    /// Declare pairs that never intersect.
    ///
    /// Fails if the fallback puzzle uses one of the excluded pairs.
    pub fn with_exclusions(mut self, exclusions: ExclusionMatrix) -> Result<Self, PuzzleError> {
        self.exclusions = exclusions;
        self.check_fallback()?;
        Ok(self)
    }

    /// Allow substring lookups when no exact name matches.
    pub fn with_partial_match(mut self) -> Self {
        self.partial_match = true;
        self
    }

    /// The category registry.
    pub fn registry(&self) -> &CategoryRegistry<F> {
        &self.registry
    }

    /// Every guessable entity.
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// Entities satisfying both categories, in catalog order.
    pub fn answers(&self, row: &CategoryId, col: &CategoryId) -> Vec<&E> {
        let (Some(row), Some(col)) = (self.registry.get(row), self.registry.get(col)) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|e| row.filter.matches(e) && col.filter.matches(e))
            .collect()
    }

    /// Answers a player can reach by typing their name.
    ///
    /// Drops entities whose name resolves to an earlier entity of the same
    /// name.
    pub fn typeable_answers(&self, row: &CategoryId, col: &CategoryId) -> Vec<&E> {
        self.answers(row, col)
            .into_iter()
            .filter(|e| self.lookup(e.name()).is_some_and(|hit| std::ptr::eq(hit, *e)))
            .collect()
    }

    /// Synchronous name lookup shared by the adapter impl.
    pub fn lookup(&self, query: &str) -> Option<&E> {
        let key = entity_key(query);
        if key.is_empty() {
            return None;
        }
        if let Some(&i) = self.names.get(&key) {
            return Some(&self.entities[i]);
        }
        if !self.partial_match {
            return None;
        }

        let hyphenated = key.split_whitespace().collect::<Vec<_>>().join("-");
        self.entities.iter().find(|e| {
            e.search_keys()
                .iter()
                .any(|k| k.contains(&key) || k.contains(&hyphenated))
        })
    }

    /// Every fallback cell needs an answer and a pair the exclusions allow.
    fn check_fallback(&self) -> Result<(), PuzzleError> {
        let empty: Vec<u8> = self
            .fallback
            .intersections()
            .filter(|(_, row, col)| {
                self.exclusions.forbids(&row.id, &col.id) || self.answers(&row.id, &col.id).is_empty()
            })
            .map(|(cell, _, _)| cell.index())
            .collect();
        if !empty.is_empty() {
            return Err(PuzzleError::Unsolvable(empty));
        }
        Ok(())
    }

    fn filter(&self, category: &Category) -> Result<&F, AdapterError> {
        self.registry
            .get(&category.id)
            .map(|def| &def.filter)
            .ok_or_else(|| AdapterError::UnknownCategory(category.id.clone()))
    }
}

/// Primary names first, then aliases; the first entity to claim a key keeps it.
fn index_names<E: Entity>(entities: &[E]) -> BTreeMap<String, usize> {
    let mut names = BTreeMap::new();
    for (i, entity) in entities.iter().enumerate() {
        names.entry(entity_key(entity.name())).or_insert(i);
    }
    for (i, entity) in entities.iter().enumerate() {
        for alias in entity.aliases() {
            names.entry(entity_key(&alias)).or_insert(i);
        }
    }
    names
}

#[async_trait]
impl<E, F> CategoryAdapter for LocalCatalog<E, F>
where
    E: Entity,
    F: EntityFilter<E>,
{
    type Entity = E;

    fn domain(&self) -> Domain {
        self.domain
    }

    fn all_categories(&self) -> Vec<Category> {
        if self.pool.is_empty() {
            return self.registry.categories();
        }
        self.pool
            .iter()
            .filter_map(|id| self.registry.category(id).cloned())
            .collect()
    }

    fn category(&self, id: &CategoryId) -> Option<Category> {
        self.registry.category(id).cloned()
    }

    async fn is_compatible(&self, a: &Category, b: &Category) -> Result<bool, AdapterError> {
        if self.exclusions.forbids(&a.id, &b.id) {
            return Ok(false);
        }
        let (fa, fb) = (self.filter(a)?, self.filter(b)?);
        Ok(self.entities.iter().any(|e| fa.matches(e) && fb.matches(e)))
    }

    async fn matches(&self, entity: &E, category: &Category) -> Result<bool, AdapterError> {
        Ok(self.filter(category)?.matches(entity))
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<E>, AdapterError> {
        Ok(self.lookup(name).cloned())
    }

    fn fallback_puzzle(&self) -> Puzzle {
        self.fallback.clone()
    }

    fn exclusions(&self) -> &ExclusionMatrix {
        &self.exclusions
    }
}

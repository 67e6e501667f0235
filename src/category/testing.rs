//! Table-driven adapter for unit tests.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AdapterError, Category, CategoryAdapter, CategoryId, Domain, Entity, ExclusionMatrix};
use crate::puzzle::Puzzle;

type CompatFn = dyn Fn(&Category, &Category) -> Result<bool, AdapterError> + Send + Sync;

/// Entity tagged with the category ids it satisfies.
#[derive(Clone, Debug)]
pub(crate) struct TestEntity {
    name: String,
    tags: BTreeSet<CategoryId>,
}

impl TestEntity {
    pub(crate) fn new(name: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tags: tags.iter().map(|t| CategoryId::new(*t)).collect(),
        }
    }
}

impl Entity for TestEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) struct TableAdapter {
    categories: Vec<Category>,
    entities: Vec<TestEntity>,
    compat: Arc<CompatFn>,
    fallback: Puzzle,
    exclusions: ExclusionMatrix,
    fail_matches: bool,
    delay: Option<Duration>,
    oracle_calls: AtomicUsize,
}

impl TableAdapter {
    /// Categories A,B in g1; C,D in g2; E,F in g3. Every pair is compatible.
    ///
    /// Entities: `XY` satisfies exactly X and Y; `only-X` satisfies only X.
    pub(crate) fn six_groups() -> Self {
        let categories = vec![
            Category::new("A", "Alpha", "g1"),
            Category::new("B", "Bravo", "g1"),
            Category::new("C", "Charlie", "g2"),
            Category::new("D", "Delta", "g2"),
            Category::new("E", "Echo", "g3"),
            Category::new("F", "Foxtrot", "g3"),
        ];

        let mut entities = Vec::new();
        let ids: Vec<String> = categories.iter().map(|c| c.id.0.clone()).collect();
        for (i, x) in ids.iter().enumerate() {
            entities.push(TestEntity::new(&format!("only-{x}"), &[x]));
            for y in &ids[i + 1..] {
                entities.push(TestEntity::new(&format!("{x}{y}"), &[x, y]));
            }
        }

        let fallback = Puzzle::new(
            [categories[0].clone(), categories[2].clone(), categories[4].clone()],
            [categories[1].clone(), categories[3].clone(), categories[5].clone()],
        );

        Self {
            categories,
            entities,
            compat: Arc::new(|_, _| Ok(true)),
            fallback,
            exclusions: ExclusionMatrix::new(),
            fail_matches: false,
            delay: None,
            oracle_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_compat<F>(mut self, compat: F) -> Self
    where
        F: Fn(&Category, &Category) -> Result<bool, AdapterError> + Send + Sync + 'static,
    {
        self.compat = Arc::new(compat);
        self
    }

    pub(crate) fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub(crate) fn with_exclusions(mut self, exclusions: ExclusionMatrix) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub(crate) fn failing_matches(mut self) -> Self {
        self.fail_matches = true;
        self
    }

    /// Every oracle call sleeps this long before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn oracle_calls(&self) -> usize {
        self.oracle_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn puzzle(&self) -> Puzzle {
        self.fallback.clone()
    }
}

#[async_trait]
impl CategoryAdapter for TableAdapter {
    type Entity = TestEntity;

    fn domain(&self) -> Domain {
        Domain::Mtg
    }

    fn all_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    async fn is_compatible(&self, a: &Category, b: &Category) -> Result<bool, AdapterError> {
        self.oracle_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.compat)(a, b)
    }

    async fn matches(&self, entity: &TestEntity, category: &Category) -> Result<bool, AdapterError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_matches {
            return Err(AdapterError::Unavailable("matches offline".into()));
        }
        Ok(entity.tags.contains(&category.id))
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<TestEntity>, AdapterError> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .entities
            .iter()
            .find(|e| e.name.to_lowercase() == wanted)
            .cloned())
    }

    fn fallback_puzzle(&self) -> Puzzle {
        self.fallback.clone()
    }

    fn exclusions(&self) -> &ExclusionMatrix {
        &self.exclusions
    }
}

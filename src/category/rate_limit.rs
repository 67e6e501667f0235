//! Request Spacing for Remote Oracles
//!
//! A shared remote card-search API should not see bursts from the nine
//! concurrent checks of a generation attempt. [`RateLimiter`] enforces a
//! minimum gap between consecutive requests with a single last-request
//! timestamp; [`RateLimitedAdapter`] applies it to every oracle call of a
//! wrapped adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::trace;

use super::{AdapterError, Category, CategoryAdapter, CategoryId, Domain, ExclusionMatrix};
use crate::puzzle::Puzzle;

/// Minimum-interval gate shared by every caller holding the same `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a gate with the given minimum spacing.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Configured spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a request may be issued, then claim the slot.
    ///
    /// Callers queue on the lock, so requests leave in arrival order.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                trace!(wait_ms = wait.as_millis() as u64, "rate limiting oracle request");
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Adapter decorator that spaces out every oracle call.
pub struct RateLimitedAdapter<A> {
    inner: A,
    limiter: Arc<RateLimiter>,
}

impl<A> RateLimitedAdapter<A> {
    /// Wrap `inner`; pass the same limiter to every adapter sharing a backend.
    pub fn new(inner: A, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }

    /// The wrapped adapter.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: CategoryAdapter> CategoryAdapter for RateLimitedAdapter<A> {
    type Entity = A::Entity;

    fn domain(&self) -> Domain {
        self.inner.domain()
    }

    fn all_categories(&self) -> Vec<Category> {
        self.inner.all_categories()
    }

    fn category(&self, id: &CategoryId) -> Option<Category> {
        self.inner.category(id)
    }

    async fn is_compatible(&self, a: &Category, b: &Category) -> Result<bool, AdapterError> {
        self.limiter.acquire().await;
        self.inner.is_compatible(a, b).await
    }

    async fn matches(&self, entity: &Self::Entity, category: &Category) -> Result<bool, AdapterError> {
        self.limiter.acquire().await;
        self.inner.matches(entity, category).await
    }

    async fn resolve_entity(&self, name: &str) -> Result<Option<Self::Entity>, AdapterError> {
        self.limiter.acquire().await;
        self.inner.resolve_entity(name).await
    }

    fn fallback_puzzle(&self) -> Puzzle {
        self.inner.fallback_puzzle()
    }

    fn exclusions(&self) -> &ExclusionMatrix {
        self.inner.exclusions()
    }
}

//! Data Source Module
//!
//! External profile/plan/wish fetchers and the read-through layer that
//! caches their results in the registry.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::registry::{CacheKind, CacheRegistry};
use crate::utils::keys;

pub use http::HttpFetcher;

// == Fetcher Trait ==
/// Loads one entity by id from the backing service.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> anyhow::Result<Value>;
}

/// Fetchers for each entity the cache fronts.
#[derive(Clone)]
pub struct DataFetchers {
    pub profile: Arc<dyn Fetcher>,
    pub plans: Arc<dyn Fetcher>,
    pub wishes: Arc<dyn Fetcher>,
    pub plan_details: Arc<dyn Fetcher>,
}

impl DataFetchers {
    /// Fetchers against a JSON REST backend rooted at `base_url`.
    ///
    /// - profile: `GET {base}/users/{id}/profile`
    /// - plans: `GET {base}/users/{id}/plans`
    /// - wishes: `GET {base}/users/{id}/wishes`
    /// - plan details: `GET {base}/plans/{id}`
    pub fn http(base_url: &str) -> Self {
        let client = reqwest::Client::new();
        let fetcher = |path: &str| -> Arc<dyn Fetcher> {
            Arc::new(HttpFetcher::new(client.clone(), base_url, path))
        };

        Self {
            profile: fetcher("/users/{id}/profile"),
            plans: fetcher("/users/{id}/plans"),
            wishes: fetcher("/users/{id}/wishes"),
            plan_details: fetcher("/plans/{id}"),
        }
    }
}

// == Cached Data Source ==
/// Reads entities through the cache, fetching and storing on a miss.
#[derive(Clone)]
pub struct CachedDataSource {
    registry: CacheRegistry,
    fetchers: DataFetchers,
}

impl CachedDataSource {
    pub fn new(registry: CacheRegistry, fetchers: DataFetchers) -> Self {
        Self { registry, fetchers }
    }

    pub fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    pub async fn user_profile(&self, user_id: &str) -> Result<Value> {
        self.read_through(
            CacheKind::User,
            &keys::user_profile(user_id),
            self.fetchers.profile.as_ref(),
            user_id,
        )
        .await
    }

    pub async fn user_plans(&self, user_id: &str) -> Result<Value> {
        self.read_through(
            CacheKind::Plan,
            &keys::user_plans(user_id),
            self.fetchers.plans.as_ref(),
            user_id,
        )
        .await
    }

    pub async fn user_wishes(&self, user_id: &str) -> Result<Value> {
        self.read_through(
            CacheKind::Wish,
            &keys::user_wishes(user_id),
            self.fetchers.wishes.as_ref(),
            user_id,
        )
        .await
    }

    pub async fn plan_details(&self, plan_id: &str) -> Result<Value> {
        self.read_through(
            CacheKind::Plan,
            &keys::plan_details(plan_id),
            self.fetchers.plan_details.as_ref(),
            plan_id,
        )
        .await
    }

    async fn read_through(
        &self,
        kind: CacheKind,
        key: &str,
        fetcher: &dyn Fetcher,
        id: &str,
    ) -> Result<Value> {
        self.registry
            .get(kind)
            .get_or_set(key, || fetcher.fetch(id), None)
            .await
    }
}

//! Best-effort cache warmup for a user.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::source::CachedDataSource;

/// Loads the user's profile, plans and wishes, one after another.
///
/// Each fetch fills its cache as a side effect. Failures are logged and
/// never returned.
pub async fn warmup_cache(source: &CachedDataSource, user_id: &str) {
    info!("Warming caches for user {}", user_id);

    if let Err(err) = source.user_profile(user_id).await {
        warn!("Warmup: failed to load profile for user {}: {}", user_id, err);
    }
    if let Err(err) = source.user_plans(user_id).await {
        warn!("Warmup: failed to load plans for user {}: {}", user_id, err);
    }
    if let Err(err) = source.user_wishes(user_id).await {
        warn!("Warmup: failed to load wishes for user {}: {}", user_id, err);
    }
}

/// Runs [`warmup_cache`] on a detached task.
pub fn spawn_warmup(source: CachedDataSource, user_id: String) -> JoinHandle<()> {
    tokio::spawn(async move { warmup_cache(&source, &user_id).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CacheKind, CacheRegistry};
    use crate::source::testing::CountingFetcher;
    use crate::source::DataFetchers;

    #[tokio::test]
    async fn test_warmup_fills_all_caches() {
        let registry = CacheRegistry::in_memory();
        let fetchers = DataFetchers {
            profile: CountingFetcher::new("profile"),
            plans: CountingFetcher::new("plans"),
            wishes: CountingFetcher::new("wishes"),
            plan_details: CountingFetcher::new("plan"),
        };
        let source = CachedDataSource::new(registry.clone(), fetchers);

        warmup_cache(&source, "u1").await;

        assert!(registry.get(CacheKind::User).has("user_profile_u1").await);
        assert!(registry.get(CacheKind::Plan).has("user_plans_u1").await);
        assert!(registry.get(CacheKind::Wish).has("user_wishes_u1").await);
    }

    #[tokio::test]
    async fn test_warmup_continues_past_failures() {
        let registry = CacheRegistry::in_memory();
        let profile = CountingFetcher::failing("profile");
        let wishes = CountingFetcher::new("wishes");
        let fetchers = DataFetchers {
            profile: profile.clone(),
            plans: CountingFetcher::failing("plans"),
            wishes: wishes.clone(),
            plan_details: CountingFetcher::new("plan"),
        };
        let source = CachedDataSource::new(registry.clone(), fetchers);

        spawn_warmup(source, "u1".to_string()).await.unwrap();

        assert_eq!(profile.calls(), 1);
        assert_eq!(wishes.calls(), 1);
        assert!(!registry.get(CacheKind::User).has("user_profile_u1").await);
        assert!(registry.get(CacheKind::Wish).has("user_wishes_u1").await);
    }
}

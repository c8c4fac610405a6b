//! Targeted cache clearing after mutations.

use tracing::info;

use crate::registry::{CacheKind, CacheRegistry};
use crate::utils::keys;

/// Clears every store in the registry.
pub async fn clear_all_caches(registry: &CacheRegistry) {
    for (_, cache) in registry.iter() {
        cache.clear().await;
    }
    info!("All caches cleared");
}

/// Drops everything cached for one user.
///
/// Also invalidates every plan list, since lists of other users may embed
/// this user's data.
pub async fn clear_user_caches(registry: &CacheRegistry, user_id: &str) {
    registry
        .get(CacheKind::User)
        .delete(&keys::user_profile(user_id))
        .await;

    let plan = registry.get(CacheKind::Plan);
    plan.delete(&keys::user_plans(user_id)).await;
    plan.invalidate(keys::USER_PLANS_PREFIX).await;

    registry
        .get(CacheKind::Wish)
        .delete(&keys::user_wishes(user_id))
        .await;

    info!("Caches cleared for user {}", user_id);
}

/// Drops a plan's details and every plan list that may embed it.
pub async fn clear_plan_caches(registry: &CacheRegistry, plan_id: &str) {
    let plan = registry.get(CacheKind::Plan);
    plan.delete(&keys::plan_details(plan_id)).await;
    plan.invalidate(keys::USER_PLANS_PREFIX).await;

    info!("Caches cleared for plan {}", plan_id);
}

//! API Handlers
//!
//! HTTP handlers for the liveness probe and the cache debug surface.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::{CacheError, Result};
use crate::models::{validate_id, ClearResponse, HealthResponse, WarmupResponse};
use crate::registry::CacheRegistry;
use crate::source::CachedDataSource;
use crate::utils::{
    cache_health_check, cache_report, clear_all_caches, clear_plan_caches, clear_user_caches,
    get_cache_stats, spawn_warmup, CacheStatsReport, HealthReport,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The named cache stores
    pub registry: CacheRegistry,
    /// Read-through data source, None when no backend is configured
    pub source: Option<CachedDataSource>,
}

impl AppState {
    /// Creates a new AppState without a data source.
    pub fn new(registry: CacheRegistry) -> Self {
        Self {
            registry,
            source: None,
        }
    }

    /// Creates a new AppState whose source reads through the same registry.
    pub fn with_source(source: CachedDataSource) -> Self {
        Self {
            registry: source.registry().clone(),
            source: Some(source),
        }
    }
}

/// Handler for GET /health
///
/// Liveness probe, independent of cache health.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for POST /debug/cache/clear
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    clear_all_caches(&state.registry).await;
    Json(ClearResponse::new("All caches cleared"))
}

/// Handler for POST /debug/cache/users/:user_id/clear
pub async fn clear_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ClearResponse>> {
    if let Some(error_msg) = validate_id("user_id", &user_id) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    clear_user_caches(&state.registry, &user_id).await;
    Ok(Json(ClearResponse::new(format!(
        "Caches cleared for user '{}'",
        user_id
    ))))
}

/// Handler for POST /debug/cache/plans/:plan_id/clear
pub async fn clear_plan_handler(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<Json<ClearResponse>> {
    if let Some(error_msg) = validate_id("plan_id", &plan_id) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    clear_plan_caches(&state.registry, &plan_id).await;
    Ok(Json(ClearResponse::new(format!(
        "Caches cleared for plan '{}'",
        plan_id
    ))))
}

/// Handler for GET /debug/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStatsReport> {
    Json(get_cache_stats(&state.registry).await)
}

/// Handler for GET /debug/cache/report
///
/// Plain-text table of per-store statistics.
pub async fn report_handler(State(state): State<AppState>) -> String {
    cache_report(&state.registry).await
}

/// Handler for POST /debug/cache/warmup/:user_id
///
/// Starts a warmup in the background and answers 202 immediately.
pub async fn warmup_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<(StatusCode, Json<WarmupResponse>)> {
    if let Some(error_msg) = validate_id("user_id", &user_id) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let source = state.source.clone().ok_or_else(|| {
        CacheError::SourceUnavailable("no data backend configured for warmup".to_string())
    })?;

    spawn_warmup(source, user_id.clone());
    Ok((StatusCode::ACCEPTED, Json(WarmupResponse::new(user_id))))
}

/// Handler for GET /debug/cache/health
pub async fn cache_health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(cache_health_check(&state.registry).await)
}

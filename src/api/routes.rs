//! API Routes
//!
//! Configures the Axum router: the liveness probe, plus the cache debug
//! surface when debug mode is on.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_health_handler, clear_all_handler, clear_plan_handler, clear_user_handler,
    health_handler, report_handler, stats_handler, warmup_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /health` - Liveness probe (always mounted)
///
/// With `debug` set:
/// - `POST /debug/cache/clear` - Clear every store
/// - `POST /debug/cache/users/:user_id/clear` - Clear one user's entries
/// - `POST /debug/cache/plans/:plan_id/clear` - Clear one plan's entries
/// - `GET /debug/cache/stats` - Per-store statistics
/// - `GET /debug/cache/report` - Statistics as a text table
/// - `POST /debug/cache/warmup/:user_id` - Warm a user's caches
/// - `GET /debug/cache/health` - Cache health check
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState, debug: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new().route("/health", get(health_handler));
    if debug {
        router = router.nest("/debug/cache", debug_routes());
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn debug_routes() -> Router<AppState> {
    Router::new()
        .route("/clear", post(clear_all_handler))
        .route("/users/:user_id/clear", post(clear_user_handler))
        .route("/plans/:plan_id/clear", post(clear_plan_handler))
        .route("/stats", get(stats_handler))
        .route("/report", get(report_handler))
        .route("/warmup/:user_id", post(warmup_handler))
        .route("/health", get(cache_health_handler))
}

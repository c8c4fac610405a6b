//! API Module
//!
//! HTTP handlers and routing.
//!
//! # Endpoints
//! - `GET /health` - Liveness probe
//! - `/debug/cache/*` - Cache debug surface, mounted only in debug mode

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

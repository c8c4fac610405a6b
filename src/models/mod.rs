//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! validating path input and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_id, MAX_ID_LENGTH};
pub use responses::{ClearResponse, ErrorResponse, HealthResponse, WarmupResponse};

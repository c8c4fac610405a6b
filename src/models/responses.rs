//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies. Stats and health
//! reports are serialized directly from their utility types.

use serde::Serialize;

/// Response body for the clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the warmup endpoint
#[derive(Debug, Clone, Serialize)]
pub struct WarmupResponse {
    /// Status message
    pub message: String,
    /// The user whose caches are being warmed
    pub user_id: String,
}

impl WarmupResponse {
    /// Creates a new WarmupResponse
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            message: format!("Warmup started for user '{}'", user_id),
            user_id,
        }
    }
}

/// Response body for the liveness endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_response_serialize() {
        let resp = ClearResponse::new("All caches cleared");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("All caches cleared"));
    }

    #[test]
    fn test_warmup_response_serialize() {
        let resp = WarmupResponse::new("u1");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert!(json["message"].as_str().unwrap().contains("u1"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}

//! Request validation for the HTTP API
//!
//! Entity ids arrive as path segments and become part of cache keys.

/// Maximum accepted id length in bytes
pub const MAX_ID_LENGTH: usize = 128;

/// Validates an entity id taken from a request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_id(field: &str, id: &str) -> Option<String> {
    if id.trim().is_empty() {
        return Some(format!("{} cannot be empty", field));
    }
    if id.len() > MAX_ID_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_ID_LENGTH
        ));
    }
    if id.chars().any(char::is_whitespace) {
        return Some(format!("{} cannot contain whitespace", field));
    }
    None
}

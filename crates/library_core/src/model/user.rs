//! Registered account model.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-assigned user identifier.
pub type UserId = i64;

/// Authenticated identity returned by login.
///
/// The stored credential never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Case-sensitive, unique across all users.
    pub username: String,
}

/// Checks registration input.
///
/// Usernames are kept exactly as given; only blank values are rejected.
pub fn validate_registration(username: &str, secret: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::BlankUsername);
    }
    if secret.is_empty() {
        return Err(ValidationError::EmptySecret);
    }
    Ok(())
}

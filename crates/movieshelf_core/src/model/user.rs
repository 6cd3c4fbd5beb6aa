//! User domain model.
//!
//! # Invariants
//! - `username` is globally unique (enforced by storage).
//! - `password` is stored as supplied; hashing is not part of this core.

use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned user identifier.
pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the record has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: String,
    pub password: String,
}

impl User {
    /// Builds an unsaved user record.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks required fields before persistence.
    ///
    /// # Errors
    /// - `EmptyUsername` when `username` is empty or whitespace.
    /// - `EmptyPassword` when `password` is empty or whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.username) {
            return Err(ValidationError::EmptyUsername);
        }
        if is_blank(&self.password) {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(())
    }
}

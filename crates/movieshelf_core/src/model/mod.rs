//! Domain records for users, movies and their association.
//!
//! # Responsibility
//! - Define the plain data shapes passed across repository boundaries.
//! - Own input validation that must pass before any write reaches storage.
//!
//! # Invariants
//! - Surrogate ids are assigned by storage, never by callers.
//! - Deletion is a hard delete; there are no tombstones.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod movie;
pub mod user;

/// Rejected write input, detected before storage is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyUsername,
    EmptyPassword,
    EmptyTitle,
    EmptyReleaseDate,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyReleaseDate => write!(f, "release date must not be empty"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

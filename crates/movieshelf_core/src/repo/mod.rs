//! Repository layer contracts, shared error taxonomy and SQLite
//! implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts (`UserRepository`,
//!   `MovieRepository`, `UserMovieRepository`).
//! - Classify storage failures into semantic errors so callers can tell a
//!   rejected write from a broken store.
//!
//! # Invariants
//! - Repository writes must call `validate()` before SQL mutations.
//! - Each repository owns its table DDL and is the only writer to it.
//! - Lookups model absence as `Ok(None)`; deletes report it as `Ok(false)`.

use crate::db::DbError;
use crate::model::movie::UserMovie;
use crate::model::ValidationError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod connection;
pub mod movie_repo;
pub mod user_movie_repo;
pub mod user_repo;

pub(crate) use connection::OwnedConnection;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected before reaching storage.
    Validation(ValidationError),
    /// UNIQUE or PRIMARY KEY constraint rejected the write.
    ConstraintViolation(String),
    /// FOREIGN KEY constraint rejected the write.
    Reference(String),
    /// Strict removal targeted an association that does not exist.
    AssociationNotFound(UserMovie),
    /// Connection, I/O or unexpected driver failure.
    Db(DbError),
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
    /// Required table is missing on the injected connection.
    MissingRequiredTable(&'static str),
    /// A thread panicked while holding the repository handle.
    ConnectionPoisoned,
}

impl RepoError {
    /// Returns whether storage rejected the write on a uniqueness rule.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    /// Returns whether storage rejected the write on a foreign key.
    pub fn is_reference_error(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConstraintViolation(detail) => write!(f, "constraint violation: {detail}"),
            Self::Reference(detail) => write!(f, "reference error: {detail}"),
            Self::AssociationNotFound(key) => write!(
                f,
                "no association found for user_id={} movie_id={}",
                key.user_id, key.movie_id
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::ConnectionPoisoned => write!(f, "repository connection lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::ConstraintViolation(_)
            | Self::Reference(_)
            | Self::AssociationNotFound(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::ConnectionPoisoned => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        let extended_code = match &value {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Some(failure.extended_code)
            }
            _ => None,
        };

        match extended_code {
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE) | Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
                Self::ConstraintViolation(value.to_string())
            }
            Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Self::Reference(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Escapes LIKE wildcards so `value` matches literally under `ESCAPE '\'`.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, RepoError};
    use rusqlite::ffi;

    fn constraint_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), Some(message.to_string()))
    }

    #[test]
    fn unique_and_primary_key_failures_are_constraint_violations() {
        let unique = RepoError::from(constraint_failure(
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: users.username",
        ));
        assert!(unique.is_constraint_violation());

        let primary = RepoError::from(constraint_failure(
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
            "UNIQUE constraint failed: user_movies.user_id, user_movies.movie_id",
        ));
        assert!(primary.is_constraint_violation());
    }

    #[test]
    fn foreign_key_failure_is_reference_error() {
        let err = RepoError::from(constraint_failure(
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed",
        ));
        assert!(err.is_reference_error());
        assert!(err.to_string().contains("FOREIGN KEY"));
    }

    #[test]
    fn not_null_failure_stays_storage_error() {
        let err = RepoError::from(constraint_failure(
            ffi::SQLITE_CONSTRAINT_NOTNULL,
            "NOT NULL constraint failed: movies.genre",
        ));
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("hobbit"), "hobbit");
    }
}

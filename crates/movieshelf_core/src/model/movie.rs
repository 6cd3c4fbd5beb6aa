//! Movie domain model and the narrow projection used by association reads.
//!
//! # Invariants
//! - `title` is globally unique (enforced by storage).
//! - `length` and `release_date` are free-form text, never parsed.

use super::user::UserId;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned movie identifier.
pub type MovieId = i64;

/// Full movie record as returned by id lookups and title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// `None` until the record has been created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    /// Free-form running time, e.g. `"169 min"`.
    #[serde(default)]
    pub length: String,
    /// Free-form release date, e.g. `"2012-12-14"`.
    pub release_date: String,
}

impl Movie {
    /// Builds an unsaved movie record.
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        length: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            genre: genre.into(),
            length: length.into(),
            release_date: release_date.into(),
        }
    }

    /// Checks required fields before persistence.
    ///
    /// `genre` and `length` may be empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError::EmptyTitle);
        }
        if is_blank(&self.release_date) {
            return Err(ValidationError::EmptyReleaseDate);
        }
        Ok(())
    }
}

/// Movie row as seen through a user's shelf: genre and length are not
/// projected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub release_date: String,
}

/// Composite key of one `user_movies` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserMovie {
    pub user_id: UserId,
    pub movie_id: MovieId,
}

#[cfg(test)]
mod tests {
    use super::Movie;
    use crate::model::ValidationError;

    #[test]
    fn validate_requires_title_and_release_date() {
        let mut movie = Movie::new("", "Fantasy", "169 min", "2012-12-14");
        assert_eq!(movie.validate(), Err(ValidationError::EmptyTitle));

        movie.title = "The Hobbit: An Unexpected Journey".to_string();
        movie.release_date = " ".to_string();
        assert_eq!(movie.validate(), Err(ValidationError::EmptyReleaseDate));

        movie.release_date = "2012-12-14".to_string();
        movie.genre.clear();
        movie.length.clear();
        assert!(movie.validate().is_ok());
    }
}

//! Library use-case service.
//!
//! # Responsibility
//! - Delegate entity CRUD to repositories without translating their errors.
//! - Normalize raw search paging input before it reaches storage.
//! - Run cross-repository workflows as compensated sequences.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - There is no cross-repository transaction; `register_user_with_movie`
//!   is best effort and may leave a user behind if compensation fails.

use crate::model::movie::{Movie, MovieId, MovieSummary, UserMovie};
use crate::model::user::{User, UserId};
use crate::repo::movie_repo::{MovieRepository, DEFAULT_SEARCH_LIMIT};
use crate::repo::user_movie_repo::UserMovieRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};

/// Normalized title search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub limit: u32,
    pub offset: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

impl SearchParams {
    /// Builds search params from untrusted query-string values.
    ///
    /// - Missing, non-numeric or non-positive `limit` becomes 20.
    /// - Missing, non-numeric or negative `offset` becomes 0.
    pub fn from_raw(query: Option<&str>, limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|value| *value > 0)
            .map_or(DEFAULT_SEARCH_LIMIT, |value| {
                u32::try_from(value).unwrap_or(u32::MAX)
            });
        let offset = offset
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|value| *value >= 0)
            .map_or(0, |value| u32::try_from(value).unwrap_or(u32::MAX));

        Self {
            query: query.unwrap_or_default().to_string(),
            limit,
            offset,
        }
    }
}

/// Use-case service over user, movie and association repositories.
pub struct LibraryService<U, M, A>
where
    U: UserRepository,
    M: MovieRepository,
    A: UserMovieRepository,
{
    users: U,
    movies: M,
    user_movies: A,
}

impl<U, M, A> LibraryService<U, M, A>
where
    U: UserRepository,
    M: MovieRepository,
    A: UserMovieRepository,
{
    pub fn new(users: U, movies: M, user_movies: A) -> Self {
        Self {
            users,
            movies,
            user_movies,
        }
    }

    /// Returns the repositories, e.g. to close their handles.
    pub fn into_parts(self) -> (U, M, A) {
        (self.users, self.movies, self.user_movies)
    }

    pub fn register_user(&self, user: &mut User) -> RepoResult<UserId> {
        self.users.create(user)
    }

    pub fn user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.users.get_by_id(id)
    }

    pub fn remove_user(&self, id: UserId) -> RepoResult<bool> {
        self.users.delete(id)
    }

    pub fn add_movie(&self, movie: &mut Movie) -> RepoResult<MovieId> {
        self.movies.create(movie)
    }

    pub fn movie(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        self.movies.get_by_id(id)
    }

    pub fn remove_movie(&self, id: MovieId) -> RepoResult<bool> {
        self.movies.delete(id)
    }

    pub fn search_movies(&self, params: &SearchParams) -> RepoResult<Vec<Movie>> {
        self.movies
            .search_by_title(&params.query, params.limit, params.offset)
    }

    pub fn all_movies(&self) -> RepoResult<Vec<Movie>> {
        self.movies.get_all()
    }

    pub fn add_movie_to_user(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()> {
        self.user_movies.associate(user_id, movie_id)
    }

    /// Unlinks a movie from a user, treating a missing link as an error.
    ///
    /// # Errors
    /// - `AssociationNotFound` when the pair was not linked.
    pub fn remove_movie_from_user(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()> {
        if self.user_movies.disassociate(user_id, movie_id)? {
            Ok(())
        } else {
            Err(RepoError::AssociationNotFound(UserMovie { user_id, movie_id }))
        }
    }

    pub fn movies_for_user(&self, user_id: UserId) -> RepoResult<Vec<MovieSummary>> {
        self.user_movies.movies_for_user(user_id)
    }

    pub fn user_has_movie(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<bool> {
        self.user_movies.user_has_movie(user_id, movie_id)
    }

    /// Creates `user` and links `movie_id` to it.
    ///
    /// When linking fails the new user is deleted again. `user.id` is reset
    /// only if that delete succeeds; when it fails too the row and its id
    /// remain. The linking error is returned in both cases.
    pub fn register_user_with_movie(
        &self,
        user: &mut User,
        movie_id: MovieId,
    ) -> RepoResult<UserId> {
        let user_id = self.users.create(user)?;

        let link_err = match self.user_movies.associate(user_id, movie_id) {
            Ok(()) => return Ok(user_id),
            Err(err) => err,
        };

        warn!(
            "event=register_with_movie module=service status=compensating user_id={user_id} movie_id={movie_id} error={link_err}"
        );
        match self.users.delete(user_id) {
            Ok(_) => {
                user.id = None;
                info!(
                    "event=register_with_movie module=service status=compensated user_id={user_id}"
                );
            }
            Err(undo_err) => error!(
                "event=register_with_movie module=service status=error error_code=compensation_failed user_id={user_id} error={undo_err}"
            ),
        }
        Err(link_err)
    }
}

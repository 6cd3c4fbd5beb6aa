//! Process-level bootstrap of the three repositories over one database file.
//!
//! # Responsibility
//! - Open one connection per repository against the same file.
//! - Construct repositories in foreign-key dependency order.
//! - Release every handle exactly once on shutdown.

use crate::db::open_db;
use crate::repo::movie_repo::SqliteMovieRepository;
use crate::repo::user_movie_repo::SqliteUserMovieRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::repo::RepoResult;
use log::{error, info};
use std::path::Path;

/// The full set of repositories for one database.
pub struct Store {
    pub users: SqliteUserRepository,
    pub movies: SqliteMovieRepository,
    pub user_movies: SqliteUserMovieRepository,
}

impl Store {
    /// Opens `path` and initializes users, movies, then user_movies.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let users = SqliteUserRepository::try_new(open_db(path)?)?;
        let movies = SqliteMovieRepository::try_new(open_db(path)?)?;
        let user_movies = SqliteUserMovieRepository::try_new(open_db(path)?)?;
        info!("event=store_open module=store status=ok");
        Ok(Self {
            users,
            movies,
            user_movies,
        })
    }

    /// Closes all three handles, returning the first failure.
    ///
    /// Every handle is released even when an earlier close fails.
    pub fn close(self) -> RepoResult<()> {
        let results = [
            self.user_movies.close(),
            self.movies.close(),
            self.users.close(),
        ];

        let mut first_error = None;
        for result in results {
            if let Err(err) = result {
                error!("event=store_close module=store status=error error={err}");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
        }
    }
}

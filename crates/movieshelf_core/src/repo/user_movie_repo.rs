//! User-movie association repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `user_movies` join table and its write path.
//! - Answer shelf queries: which movies a user has, and membership checks.
//!
//! # Invariants
//! - At most one row per `(user_id, movie_id)` (composite primary key).
//! - Rows may only reference existing users and movies, and disappear when
//!   either side is deleted (`ON DELETE CASCADE`).
//! - Construction fails unless `users` and `movies` already exist.

use super::{OwnedConnection, RepoError, RepoResult};
use crate::db::schema::table_exists;
use crate::model::movie::{MovieId, MovieSummary};
use crate::model::user::UserId;
use log::{debug, info, warn};
use rusqlite::{params, Connection};

pub(crate) const USER_MOVIES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS user_movies (
    user_id INTEGER NOT NULL,
    movie_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, movie_id),
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (movie_id) REFERENCES movies(id) ON DELETE CASCADE
);";

const REFERENCED_TABLES: [&str; 2] = ["users", "movies"];

/// Repository interface for the user/movie many-to-many association.
pub trait UserMovieRepository {
    /// Links `movie_id` to `user_id`.
    ///
    /// Fails with `ConstraintViolation` for an existing pair and with
    /// `Reference` when either id is unknown.
    fn associate(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()>;
    /// Unlinks the pair; `false` means no association existed.
    fn disassociate(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<bool>;
    /// Movies linked to `user_id`, ordered by movie id.
    fn movies_for_user(&self, user_id: UserId) -> RepoResult<Vec<MovieSummary>>;
    /// Membership test; unknown ids simply yield `false`.
    fn user_has_movie(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<bool>;
}

/// SQLite-backed association repository owning its connection.
pub struct SqliteUserMovieRepository {
    conn: OwnedConnection,
}

impl SqliteUserMovieRepository {
    /// Takes ownership of `conn` and ensures `user_movies` exists.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `users` or `movies` has not been created
    ///   on this database yet.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        for table in REFERENCED_TABLES {
            if !table_exists(&conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        conn.execute_batch(USER_MOVIES_TABLE_SQL)?;
        Ok(Self {
            conn: OwnedConnection::new(conn),
        })
    }

    /// Releases the owned connection.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close()
    }
}

impl UserMovieRepository for SqliteUserMovieRepository {
    fn associate(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()> {
        let result = self.conn.with(|conn| {
            conn.execute(
                "INSERT INTO user_movies (user_id, movie_id) VALUES (?1, ?2);",
                params![user_id, movie_id],
            )?;
            Ok(())
        });

        match &result {
            Ok(()) => info!(
                "event=user_movie_link module=repo status=ok user_id={user_id} movie_id={movie_id}"
            ),
            Err(err) => warn!(
                "event=user_movie_link module=repo status=error user_id={user_id} movie_id={movie_id} error={err}"
            ),
        }
        result
    }

    fn disassociate(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<bool> {
        let changed = self.conn.with(|conn| {
            Ok(conn.execute(
                "DELETE FROM user_movies WHERE user_id = ?1 AND movie_id = ?2;",
                params![user_id, movie_id],
            )?)
        })?;

        if changed > 0 {
            info!(
                "event=user_movie_unlink module=repo status=ok user_id={user_id} movie_id={movie_id}"
            );
        } else {
            debug!(
                "event=user_movie_unlink module=repo status=absent user_id={user_id} movie_id={movie_id}"
            );
        }
        Ok(changed > 0)
    }

    fn movies_for_user(&self, user_id: UserId) -> RepoResult<Vec<MovieSummary>> {
        self.conn.with(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.title, m.release_date
                 FROM movies m
                 INNER JOIN user_movies um ON m.id = um.movie_id
                 WHERE um.user_id = ?1
                 ORDER BY m.id ASC;",
            )?;
            let mut rows = stmt.query([user_id])?;
            let mut movies = Vec::new();
            while let Some(row) = rows.next()? {
                let id: MovieId = row.get("id")?;
                let release_date = row
                    .get::<_, Option<String>>("release_date")?
                    .ok_or_else(|| {
                        RepoError::InvalidData(format!(
                            "movie {id} has NULL in movies.release_date"
                        ))
                    })?;
                movies.push(MovieSummary {
                    id,
                    title: row.get("title")?,
                    release_date,
                });
            }
            Ok(movies)
        })
    }

    fn user_has_movie(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<bool> {
        self.conn.with(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM user_movies WHERE user_id = ?1 AND movie_id = ?2;",
                params![user_id, movie_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }
}

//! Movie repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `movies` table schema and its write path.
//! - Provide create/get/delete and case-insensitive title search.
//!
//! # Invariants
//! - `create` validates input before SQL and writes the generated id back.
//! - Title search is a substring match on `lower(title)`; the term is always
//!   a bound parameter and LIKE wildcards in it match literally.
//! - `limit`/`offset` are applied exactly as supplied; callers normalize.
//! - Search results are ordered by `id ASC`.

use super::{escape_like, OwnedConnection, RepoError, RepoResult};
use crate::model::movie::{Movie, MovieId};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

/// Page size used by [`MovieRepository::get_all`] and by callers that
/// receive no usable limit.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

pub(crate) const MOVIES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    length TEXT NOT NULL,
    genre TEXT NOT NULL,
    release_date TEXT
);";

const MOVIE_SELECT_SQL: &str = "SELECT
    id,
    title,
    length,
    genre,
    release_date
FROM movies";

/// Repository interface for movie records.
pub trait MovieRepository {
    /// Inserts `movie`, stores the assigned id in `movie.id` and returns it.
    fn create(&self, movie: &mut Movie) -> RepoResult<MovieId>;
    /// Returns the full movie with `id`, or `None` when absent.
    fn get_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>>;
    /// Removes the movie with `id`; `false` means no such row existed.
    fn delete(&self, id: MovieId) -> RepoResult<bool>;
    /// Case-insensitive "contains" search on title. Empty `query` matches all.
    fn search_by_title(&self, query: &str, limit: u32, offset: u32) -> RepoResult<Vec<Movie>>;

    /// First page of all movies.
    fn get_all(&self) -> RepoResult<Vec<Movie>> {
        self.search_by_title("", DEFAULT_SEARCH_LIMIT, 0)
    }
}

/// SQLite-backed movie repository owning its connection.
pub struct SqliteMovieRepository {
    conn: OwnedConnection,
}

impl SqliteMovieRepository {
    /// Takes ownership of `conn` and ensures the `movies` table exists.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        conn.execute_batch(MOVIES_TABLE_SQL)?;
        Ok(Self {
            conn: OwnedConnection::new(conn),
        })
    }

    /// Releases the owned connection.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close()
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn create(&self, movie: &mut Movie) -> RepoResult<MovieId> {
        movie.validate()?;

        let result = self.conn.with(|conn| {
            conn.execute(
                "INSERT INTO movies (title, genre, length, release_date)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    movie.title.as_str(),
                    movie.genre.as_str(),
                    movie.length.as_str(),
                    movie.release_date.as_str(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        });

        match result {
            Ok(id) => {
                movie.id = Some(id);
                info!("event=movie_create module=repo status=ok movie_id={id}");
                Ok(id)
            }
            Err(err) => {
                warn!("event=movie_create module=repo status=error error={err}");
                Err(err)
            }
        }
    }

    fn get_by_id(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        self.conn.with(|conn| {
            let mut stmt = conn.prepare(&format!("{MOVIE_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(parse_movie_row(row)?));
            }
            Ok(None)
        })
    }

    fn delete(&self, id: MovieId) -> RepoResult<bool> {
        let changed = self
            .conn
            .with(|conn| Ok(conn.execute("DELETE FROM movies WHERE id = ?1;", [id])?))?;

        if changed > 0 {
            info!("event=movie_delete module=repo status=ok movie_id={id}");
        } else {
            debug!("event=movie_delete module=repo status=absent movie_id={id}");
        }
        Ok(changed > 0)
    }

    fn search_by_title(&self, query: &str, limit: u32, offset: u32) -> RepoResult<Vec<Movie>> {
        let mut sql = String::from(MOVIE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.is_empty() {
            sql.push_str(" WHERE lower(title) LIKE ? ESCAPE '\\'");
            let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(" ORDER BY id ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(limit)));
        bind_values.push(Value::Integer(i64::from(offset)));

        let movies = self.conn.with(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut movies = Vec::new();
            while let Some(row) = rows.next()? {
                movies.push(parse_movie_row(row)?);
            }
            Ok(movies)
        })?;

        debug!(
            "event=movie_search module=repo status=ok query_len={} limit={limit} offset={offset} hits={}",
            query.chars().count(),
            movies.len()
        );
        Ok(movies)
    }
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let id: MovieId = row.get("id")?;
    let release_date = row
        .get::<_, Option<String>>("release_date")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("movie {id} has NULL in movies.release_date"))
        })?;

    Ok(Movie {
        id: Some(id),
        title: row.get("title")?,
        genre: row.get("genre")?,
        length: row.get("length")?,
        release_date,
    })
}

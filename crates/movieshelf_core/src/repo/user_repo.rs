//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `users` table schema and its write path.
//! - Provide create/get/delete over user records.
//!
//! # Invariants
//! - `create` validates input before SQL and writes the generated id back.
//! - Deleting a user cascades to its `user_movies` rows.
//! - Passwords never appear in log events.

use super::{OwnedConnection, RepoResult};
use crate::model::user::{User, UserId};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const USERS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);";

/// Repository interface for user records.
pub trait UserRepository {
    /// Inserts `user`, stores the assigned id in `user.id` and returns it.
    fn create(&self, user: &mut User) -> RepoResult<UserId>;
    /// Returns the user with `id`, or `None` when absent.
    fn get_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Removes the user with `id`; `false` means no such row existed.
    fn delete(&self, id: UserId) -> RepoResult<bool>;
}

/// SQLite-backed user repository owning its connection.
pub struct SqliteUserRepository {
    conn: OwnedConnection,
}

impl SqliteUserRepository {
    /// Takes ownership of `conn` and ensures the `users` table exists.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        conn.execute_batch(USERS_TABLE_SQL)?;
        Ok(Self {
            conn: OwnedConnection::new(conn),
        })
    }

    /// Releases the owned connection.
    pub fn close(self) -> RepoResult<()> {
        self.conn.close()
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: &mut User) -> RepoResult<UserId> {
        user.validate()?;

        let result = self.conn.with(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2);",
                params![user.username.as_str(), user.password.as_str()],
            )?;
            Ok(conn.last_insert_rowid())
        });

        match result {
            Ok(id) => {
                user.id = Some(id);
                info!("event=user_create module=repo status=ok user_id={id}");
                Ok(id)
            }
            Err(err) => {
                warn!("event=user_create module=repo status=error error={err}");
                Err(err)
            }
        }
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn.with(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, password FROM users WHERE id = ?1;",
                    [id],
                    parse_user_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    fn delete(&self, id: UserId) -> RepoResult<bool> {
        let changed = self
            .conn
            .with(|conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1;", [id])?))?;

        if changed > 0 {
            info!("event=user_delete module=repo status=ok user_id={id}");
        } else {
            debug!("event=user_delete module=repo status=absent user_id={id}");
        }
        Ok(changed > 0)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get("id")?),
        username: row.get("username")?,
        password: row.get("password")?,
    })
}

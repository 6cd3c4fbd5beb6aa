//! Table creation in foreign-key dependency order.
//!
//! DDL text lives with the repository that owns each table; this module only
//! sequences it for callers that bootstrap a whole database on one handle.

use super::DbResult;
use crate::repo::movie_repo::MOVIES_TABLE_SQL;
use crate::repo::user_movie_repo::USER_MOVIES_TABLE_SQL;
use crate::repo::user_repo::USERS_TABLE_SQL;
use rusqlite::Connection;

/// Tables created by [`init_schema`], in creation order.
pub const TABLES: [&str; 3] = ["users", "movies", "user_movies"];

/// Creates `users`, `movies` and `user_movies` if they do not exist.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(USERS_TABLE_SQL)?;
    conn.execute_batch(MOVIES_TABLE_SQL)?;
    conn.execute_batch(USER_MOVIES_TABLE_SQL)?;
    Ok(())
}

/// Returns whether `table` exists on this connection.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

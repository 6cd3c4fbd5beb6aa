//! Exclusively owned repository connection handle.
//!
//! # Invariants
//! - One handle per repository, injected at construction.
//! - Statements run while the handle lock is held, so an insert and its
//!   `last_insert_rowid()` read are never interleaved with another call.
//! - `close` consumes the handle; it cannot be released twice.

use super::{RepoError, RepoResult};
use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};

pub(crate) struct OwnedConnection {
    conn: Mutex<Connection>,
}

impl OwnedConnection {
    pub(crate) fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `op` with exclusive access to the connection.
    pub(crate) fn with<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let guard = self.conn.lock().map_err(|_| RepoError::ConnectionPoisoned)?;
        op(&*guard)
    }

    /// Releases the underlying SQLite handle.
    ///
    /// A poisoned lock does not prevent release.
    pub(crate) fn close(self) -> RepoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| RepoError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::OwnedConnection;
    use crate::repo::{RepoError, RepoResult};
    use rusqlite::Connection;
    use std::panic::{self, AssertUnwindSafe};

    fn poisoned_handle() -> OwnedConnection {
        let handle = OwnedConnection::new(Connection::open_in_memory().unwrap());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            handle.with(|_| -> RepoResult<()> { panic!("worker crashed mid-statement") })
        }));
        assert!(outcome.is_err());
        handle
    }

    #[test]
    fn with_runs_statement_on_healthy_handle() {
        let handle = OwnedConnection::new(Connection::open_in_memory().unwrap());
        let value = handle
            .with(|conn| {
                let sum: i64 = conn.query_row("SELECT 41 + 1;", [], |row| row.get(0))?;
                Ok(sum)
            })
            .unwrap();
        assert_eq!(value, 42);
        handle.close().unwrap();
    }

    #[test]
    fn with_reports_poisoned_lock() {
        let handle = poisoned_handle();
        let err = handle.with(|_| Ok(())).unwrap_err();
        assert!(matches!(err, RepoError::ConnectionPoisoned));
    }

    #[test]
    fn close_releases_poisoned_handle() {
        let handle = poisoned_handle();
        handle.close().unwrap();
    }
}

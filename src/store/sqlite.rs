//! SQLite implementation of the primary store.
//!
//! One table, insert-only. The schema is created on open, so a fresh
//! deployment needs no migration step. The creation timestamp is assigned by
//! the database itself (UTC, ISO-8601 with milliseconds).

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::{params, Connection};

use super::{RsvpStore, StoreError};
use crate::types::{NewRsvp, RsvpId};

/// Busy timeout for concurrent writers (ms).
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema for the RSVP table.
///
/// `ip_hash` and `user_agent` are nullable: either header may be absent from
/// the request. `created_at` mirrors the ISO-8601 UTC format used for the
/// spreadsheet timestamp.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rsvp_responses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    attending   TEXT NOT NULL,
    guests      INTEGER NOT NULL,
    ip_hash     TEXT,
    user_agent  TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// A primary store backed by a SQLite database file.
///
/// The connection is guarded by a mutex; each request performs a single
/// prepared insert, so contention is limited to the insert itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<SqliteStore, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory database. Useful for tests.
    pub fn open_in_memory() -> Result<SqliteStore, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<SqliteStore, StoreError> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

impl RsvpStore for SqliteStore {
    fn insert(&self, rsvp: &NewRsvp) -> Result<RsvpId, StoreError> {
        // A poisoned lock only means another thread panicked mid-insert; the
        // connection itself is still usable.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        let mut stmt = conn.prepare_cached(
            "INSERT INTO rsvp_responses (name, attending, guests, ip_hash, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(params![
            rsvp.name,
            rsvp.attending.as_str(),
            i64::from(rsvp.guests.as_u8()),
            rsvp.ip_hash,
            rsvp.user_agent,
        ])?;

        Ok(RsvpId(conn.last_insert_rowid()))
    }
}

//! The primary store for RSVP records.
//!
//! The handler talks to the store through the `RsvpStore` trait so that the
//! database is an explicitly passed dependency rather than ambient state.
//! This also enables mock stores for handler tests. The production
//! implementation is `SqliteStore`.
//!
//! Deployments without a database binding simply construct the server with no
//! store at all ("primary store unavailable"), which is a degraded mode, not
//! an error.

use thiserror::Error;

use crate::types::{NewRsvp, RsvpId};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Errors raised by a primary store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error (open, schema, or insert failure).
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// The primary store interface: a single insert, no read-modify-write.
///
/// Records are immutable once written; the handler never updates or deletes.
pub trait RsvpStore {
    /// Inserts one RSVP record, returning the row id assigned by the store.
    fn insert(&self, rsvp: &NewRsvp) -> Result<RsvpId, StoreError>;
}

//! RSVP Service - the backend for a static wedding-information website.
//!
//! The site itself is static; the one dynamic feature is the RSVP form. This
//! library provides the submission endpoint: validate a small JSON payload,
//! persist the response to a SQLite database, and best-effort mirror it to a
//! spreadsheet-sync webhook for human review.

pub mod config;
pub mod iphash;
pub mod server;
pub mod sink;
pub mod store;
pub mod types;
pub mod validate;

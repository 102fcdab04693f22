//! Validation of RSVP submissions.
//!
//! The validation sequence short-circuits: the first failing rule wins and
//! its message is surfaced to the client verbatim. Rules, in order:
//!
//! 1. `name` must be present, string-typed, and non-empty after trimming.
//! 2. `attending` must equal exactly `"Yes"` or `"No"` (case-sensitive).
//! 3. `guests` is then derived, never rejected: the numeric interpretation of
//!    the supplied value clamped into 0..=9 when attending, 0 otherwise.
//!
//! The body is handled as a loosely-typed `serde_json::Value` rather than a
//! derived struct so that a wrong-typed or missing field produces the
//! field-specific message instead of a generic deserialization error.

use serde_json::Value;
use thiserror::Error;

use crate::types::{Attending, GuestCount, ValidatedRsvp};

/// A client input error. The display strings are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `name` missing, not a string, or empty after trimming.
    #[error("Name is required")]
    NameRequired,

    /// `attending` missing or not exactly `"Yes"` / `"No"`.
    #[error("Invalid attending value")]
    InvalidAttending,
}

/// Validates a decoded request body into a `ValidatedRsvp`.
pub fn validate_submission(body: &Value) -> Result<ValidatedRsvp, ValidationError> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::NameRequired)?;

    let attending = match body.get("attending").and_then(Value::as_str) {
        Some("Yes") => Attending::Yes,
        Some("No") => Attending::No,
        _ => return Err(ValidationError::InvalidAttending),
    };

    // Guest count is derived, never rejected. "No" forces zero regardless of
    // whatever the client sent.
    let guests = match attending {
        Attending::Yes => GuestCount::clamped(numeric_interpretation(body.get("guests"))),
        Attending::No => GuestCount::ZERO,
    };

    Ok(ValidatedRsvp {
        name: name.to_string(),
        attending,
        guests,
    })
}

/// The numeric interpretation of a JSON value: numbers and numeric strings
/// count, everything else (including missing) is 0.
fn numeric_interpretation(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

//! Domain types for one RSVP submission.
//!
//! These types encode the invariants of the data model: `attending` is always
//! exactly `"Yes"` or `"No"`, and a guest count is always within 0..=9. Code
//! holding a `ValidatedRsvp` can rely on both without re-checking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the respondent is attending.
///
/// The wire values are case-sensitive: `"yes"` or `"Maybe"` do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attending {
    Yes,
    No,
}

impl Attending {
    /// Returns the wire/storage representation (`"Yes"` or `"No"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Attending::Yes => "Yes",
            Attending::No => "No",
        }
    }
}

impl fmt::Display for Attending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest count, guaranteed to be within 0..=9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestCount(u8);

impl GuestCount {
    /// The maximum number of guests a single RSVP may bring.
    pub const MAX: u8 = 9;

    /// No guests.
    pub const ZERO: GuestCount = GuestCount(0);

    /// Clamps an arbitrary numeric interpretation into 0..=9.
    ///
    /// Non-finite input (the "numeric interpretation" of garbage) becomes 0,
    /// fractional counts are truncated.
    pub fn clamped(n: f64) -> GuestCount {
        if !n.is_finite() {
            return GuestCount::ZERO;
        }
        GuestCount(n.clamp(0.0, Self::MAX as f64) as u8)
    }

    /// Returns the count as a plain integer.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for GuestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submission that has passed validation.
///
/// `name` is trimmed and non-empty; `guests` is already derived (zero when
/// not attending, clamped otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRsvp {
    pub name: String,
    pub attending: Attending,
    pub guests: GuestCount,
}

/// The row identifier assigned by the primary store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RsvpId(pub i64);

impl fmt::Display for RsvpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record ready to be inserted into the primary store.
///
/// This is the validated submission plus the request-derived context fields.
/// The creation timestamp is assigned by the store itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRsvp {
    pub name: String,
    pub attending: Attending,
    pub guests: GuestCount,

    /// Truncated salted digest of the client address, if one was known.
    pub ip_hash: Option<String>,

    /// Client user agent, truncated to 255 characters.
    pub user_agent: Option<String>,
}

/// The payload mirrored to the spreadsheet webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPayload {
    pub name: String,
    pub attending: Attending,
    pub guests: GuestCount,

    /// Forward time in ISO-8601 UTC, generated when the forward is attempted.
    pub timestamp: DateTime<Utc>,
}

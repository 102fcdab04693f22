//! Core domain types for the RSVP service.
//!
//! Invariants live in the types: an `Attending` is always exactly "Yes" or
//! "No", and a `GuestCount` is always within 0..=9.

pub mod rsvp;

// Re-export commonly used types at the module level
pub use rsvp::{Attending, GuestCount, NewRsvp, RsvpId, SheetPayload, ValidatedRsvp};

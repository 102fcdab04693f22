//! The secondary sink: a best-effort mirror of each RSVP.
//!
//! Every accepted submission is forwarded to a spreadsheet-sync webhook so a
//! human can review responses without touching the database. The forward is
//! fire-and-forget: the sink's HTTP response is never inspected (the webhook
//! may be reachable only in a mode that hides its response), so the only
//! observable outcome is whether the call raised a transport error. That is
//! why `forward` returns a `ForwardError` rather than a full HTTP result.
//!
//! There is no retry or queue; each forward is attempted at most once per
//! request.

use std::future::Future;

use thiserror::Error;

use crate::types::SheetPayload;

pub mod sheets;

pub use sheets::SheetsWebhook;

/// A transport-level failure reaching the sink.
///
/// Deliberately message-only: an HTTP error status from the sink is *not* a
/// `ForwardError`, because the response is never read.
#[derive(Debug, Clone, Error)]
#[error("sink transport error: {message}")]
pub struct ForwardError {
    message: String,
}

impl ForwardError {
    /// Creates a forward error with the given description.
    pub fn new(message: impl Into<String>) -> ForwardError {
        ForwardError {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(e: reqwest::Error) -> ForwardError {
        ForwardError::new(e.to_string())
    }
}

/// Best-effort notification of the spreadsheet mirror.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct FailingSink;
///
/// impl SheetSink for FailingSink {
///     async fn forward(&self, _payload: &SheetPayload) -> Result<(), ForwardError> {
///         Err(ForwardError::new("connection refused"))
///     }
/// }
/// ```
pub trait SheetSink {
    /// Attempts to deliver one payload. `Ok(())` means only that no transport
    /// error was raised; nothing is known about what the sink did with it.
    fn forward(
        &self,
        payload: &SheetPayload,
    ) -> impl Future<Output = Result<(), ForwardError>> + Send;
}

//! Webhook implementation of the secondary sink.

use reqwest::Client;

use super::{ForwardError, SheetSink};
use crate::types::SheetPayload;

/// Forwards payloads to a Google Apps Script webhook as JSON.
///
/// No explicit timeout is configured; the hosting environment's ambient
/// request timeout bounds the call.
#[derive(Clone)]
pub struct SheetsWebhook {
    client: Client,
    url: String,
}

impl SheetsWebhook {
    /// Creates a sink posting to the given webhook URL.
    pub fn new(url: impl Into<String>) -> SheetsWebhook {
        SheetsWebhook {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Returns the webhook URL this sink posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SheetSink for SheetsWebhook {
    async fn forward(&self, payload: &SheetPayload) -> Result<(), ForwardError> {
        // The response status and body are intentionally ignored: success
        // means only that the request made it onto the wire.
        self.client.post(&self.url).json(payload).send().await?;
        Ok(())
    }
}

impl std::fmt::Debug for SheetsWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsWebhook")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

//! RSVP submission endpoint handler.
//!
//! Accepts one submission per request, validates it, and performs up to two
//! independent writes: an insert into the primary store and a best-effort
//! forward to the spreadsheet sink. Each write is individually
//! fault-tolerant; the request only fails outright when *both* writes fail.
//! Validation errors short-circuit before any write happens.
//!
//! The static site is served from a different origin, so every response
//! carries `Access-Control-Allow-Origin: *` and the endpoint answers CORS
//! preflight requests.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use super::AppState;
use crate::iphash::hash_ip;
use crate::sink::SheetSink;
use crate::store::RsvpStore;
use crate::types::{NewRsvp, SheetPayload};
use crate::validate::{validate_submission, ValidationError};

/// Header carrying the client's source address (first entry wins when the
/// request passed through multiple proxies).
const HEADER_CLIENT_IP: &str = "x-forwarded-for";
/// Header carrying the client's user agent.
const HEADER_USER_AGENT: &str = "user-agent";

/// Maximum stored length of the user agent, in characters.
const USER_AGENT_MAX_CHARS: usize = 255;

/// Errors that can occur when processing a submission.
///
/// The display strings are the wire contract: they are surfaced to the client
/// verbatim in the `error` field of the response body.
#[derive(Debug, Error)]
pub enum RsvpError {
    /// Client input error from the validation sequence.
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    /// Both the primary write and the secondary forward failed.
    #[error("Failed to save RSVP")]
    NothingSaved,

    /// The request body was not valid JSON.
    #[error("Internal server error")]
    MalformedBody(#[source] serde_json::Error),
}

impl IntoResponse for RsvpError {
    fn into_response(self) -> Response {
        let status = match &self {
            RsvpError::Invalid(_) => StatusCode::BAD_REQUEST,
            RsvpError::NothingSaved => StatusCode::INTERNAL_SERVER_ERROR,
            RsvpError::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, cors_allow_origin(), Json(body)).into_response()
    }
}

/// Error response body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Success response body, reporting which of the two sinks took the write.
#[derive(Debug, Serialize)]
struct RsvpAccepted {
    success: bool,
    storage: StorageOutcome,
}

/// Per-sink outcome of the dual write.
#[derive(Debug, Serialize)]
struct StorageOutcome {
    primary: bool,
    secondary: bool,
}

fn cors_allow_origin() -> [(HeaderName, &'static str); 1] {
    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")]
}

/// RSVP submission handler.
///
/// # Request
///
/// - Method: POST
/// - Body: `{"name": string, "attending": "Yes"|"No", "guests": number}`
///
/// # Response
///
/// - 200 OK: `{"success": true, "storage": {"primary": bool, "secondary": bool}}`
///   (at least one of the two flags is true)
/// - 400 Bad Request: `{"error": "Name is required"}` or
///   `{"error": "Invalid attending value"}`
/// - 500 Internal Server Error: `{"error": "Failed to save RSVP"}` when both
///   writes failed, `{"error": "Internal server error"}` for a malformed body
pub async fn rsvp_handler<S, N>(
    State(state): State<AppState<S, N>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RsvpError>
where
    S: RsvpStore + Send + Sync + 'static,
    N: SheetSink + Send + Sync + 'static,
{
    let body_json: serde_json::Value =
        serde_json::from_slice(&body).map_err(RsvpError::MalformedBody)?;

    // Validation short-circuits before any write.
    let rsvp = validate_submission(&body_json)?;

    // 1. Primary write. A missing store handle is a degraded deployment, not
    //    an error; an insert failure is logged and the request continues.
    let primary = match state.store() {
        Some(store) => {
            let record = NewRsvp {
                name: rsvp.name.clone(),
                attending: rsvp.attending,
                guests: rsvp.guests,
                ip_hash: client_ip(&headers).map(|ip| hash_ip(&ip)),
                user_agent: user_agent(&headers),
            };
            match store.insert(&record) {
                Ok(id) => {
                    info!(id = %id, attending = %rsvp.attending, guests = %rsvp.guests, "RSVP stored");
                    true
                }
                Err(e) => {
                    error!(error = %e, "primary store insert failed");
                    false
                }
            }
        }
        None => {
            debug!("no primary store configured; skipping insert");
            false
        }
    };

    // 2. Secondary forward, attempted unconditionally. Only a transport
    //    error counts as failure; the sink's response is never read.
    let payload = SheetPayload {
        name: rsvp.name,
        attending: rsvp.attending,
        guests: rsvp.guests,
        timestamp: Utc::now(),
    };
    let secondary = match state.sink().forward(&payload).await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "spreadsheet forward failed");
            false
        }
    };

    // At least one write must have landed somewhere.
    if !primary && !secondary {
        return Err(RsvpError::NothingSaved);
    }

    let accepted = RsvpAccepted {
        success: true,
        storage: StorageOutcome { primary, secondary },
    };
    Ok((StatusCode::OK, cors_allow_origin(), Json(accepted)).into_response())
}

/// CORS preflight handler.
///
/// Always responds 204 with no body, advertising that `POST` and `OPTIONS`
/// are allowed with a `Content-Type` request header.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Extracts the client address from the forwarding header, if present.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get(HEADER_CLIENT_IP)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extracts the user agent, truncated to the stored maximum.
fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(HEADER_USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(USER_AGENT_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::body::to_bytes;
    use serde_json::{json, Value};

    use crate::sink::ForwardError;
    use crate::store::StoreError;
    use crate::types::RsvpId;

    /// Recording store that can be told to fail every insert.
    #[derive(Default)]
    struct MockStore {
        fail: bool,
        inserted: Mutex<Vec<NewRsvp>>,
    }

    impl MockStore {
        fn failing() -> Arc<MockStore> {
            Arc::new(MockStore {
                fail: true,
                ..MockStore::default()
            })
        }
    }

    impl RsvpStore for Arc<MockStore> {
        fn insert(&self, rsvp: &NewRsvp) -> Result<RsvpId, StoreError> {
            if self.fail {
                return Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery));
            }
            let mut inserted = self.inserted.lock().unwrap();
            inserted.push(rsvp.clone());
            Ok(RsvpId(inserted.len() as i64))
        }
    }

    /// Recording sink that can be told to fail every forward.
    #[derive(Default)]
    struct MockSink {
        fail: bool,
        sent: Mutex<Vec<SheetPayload>>,
    }

    impl MockSink {
        fn failing() -> Arc<MockSink> {
            Arc::new(MockSink {
                fail: true,
                ..MockSink::default()
            })
        }
    }

    impl SheetSink for Arc<MockSink> {
        async fn forward(&self, payload: &SheetPayload) -> Result<(), ForwardError> {
            if self.fail {
                return Err(ForwardError::new("connection refused"));
            }
            self.sent.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn state(
        store: Option<Arc<MockStore>>,
        sink: Arc<MockSink>,
    ) -> AppState<Arc<MockStore>, Arc<MockSink>> {
        AppState::new(store, sink)
    }

    async fn submit(
        state: AppState<Arc<MockStore>, Arc<MockSink>>,
        headers: HeaderMap,
        body: &str,
    ) -> (StatusCode, HeaderMap, Value) {
        let response = rsvp_handler(State(state), headers, Bytes::from(body.to_string()))
            .await
            .into_response();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, headers, body)
    }

    fn canonical_body() -> String {
        json!({"name": "Alex Smith", "attending": "Yes", "guests": 3}).to_string()
    }

    #[tokio::test]
    async fn both_sinks_up_returns_200_with_both_flags() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(MockSink::default());

        let (status, headers, body) = submit(
            state(Some(store.clone()), sink.clone()),
            HeaderMap::new(),
            &canonical_body(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["storage"]["primary"], true);
        assert_eq!(body["storage"]["secondary"], true);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].name, "Alex Smith");
        assert_eq!(inserted[0].guests.as_u8(), 3);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name, "Alex Smith");
    }

    #[tokio::test]
    async fn missing_store_still_succeeds_via_the_sink() {
        let sink = Arc::new(MockSink::default());

        let (status, _, body) =
            submit(state(None, sink), HeaderMap::new(), &canonical_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"]["primary"], false);
        assert_eq!(body["storage"]["secondary"], true);
    }

    #[tokio::test]
    async fn failing_sink_still_succeeds_via_the_store() {
        let store = Arc::new(MockStore::default());

        let (status, _, body) = submit(
            state(Some(store), MockSink::failing()),
            HeaderMap::new(),
            &canonical_body(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"]["primary"], true);
        assert_eq!(body["storage"]["secondary"], false);
    }

    #[tokio::test]
    async fn both_failing_is_a_500() {
        let (status, headers, body) = submit(
            state(Some(MockStore::failing()), MockSink::failing()),
            HeaderMap::new(),
            &canonical_body(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save RSVP");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn validation_failure_never_touches_either_sink() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(MockSink::default());

        let body = json!({"name": "   ", "attending": "Yes"}).to_string();
        let (status, _, response) = submit(
            state(Some(store.clone()), sink.clone()),
            HeaderMap::new(),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Name is required");
        assert!(store.inserted.lock().unwrap().is_empty());
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lowercase_attending_is_rejected() {
        let body = json!({"name": "Alex", "attending": "yes", "guests": 2}).to_string();
        let (status, _, response) = submit(
            state(None, Arc::new(MockSink::default())),
            HeaderMap::new(),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Invalid attending value");
    }

    #[tokio::test]
    async fn malformed_json_is_an_internal_error() {
        let (status, _, response) = submit(
            state(None, Arc::new(MockSink::default())),
            HeaderMap::new(),
            "not json{",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["error"], "Internal server error");
    }

    #[tokio::test]
    async fn not_attending_stores_and_forwards_zero_guests() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(MockSink::default());

        let body = json!({"name": "Alex", "attending": "No", "guests": 5}).to_string();
        let (status, _, _) = submit(
            state(Some(store.clone()), sink.clone()),
            HeaderMap::new(),
            &body,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.inserted.lock().unwrap()[0].guests.as_u8(), 0);
        assert_eq!(sink.sent.lock().unwrap()[0].guests.as_u8(), 0);
    }

    #[tokio::test]
    async fn client_context_is_hashed_and_truncated() {
        let store = Arc::new(MockStore::default());
        let sink = Arc::new(MockSink::default());

        let mut headers = HeaderMap::new();
        headers.insert(
            HEADER_CLIENT_IP,
            "203.0.113.7, 10.0.0.1".parse().unwrap(),
        );
        let long_agent = "a".repeat(300);
        headers.insert(HEADER_USER_AGENT, long_agent.parse().unwrap());

        submit(state(Some(store.clone()), sink), headers, &canonical_body()).await;

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted[0].ip_hash.as_deref(), Some(hash_ip("203.0.113.7").as_str()));
        assert_eq!(inserted[0].user_agent.as_ref().unwrap().len(), 255);
    }

    #[tokio::test]
    async fn absent_headers_store_as_none() {
        let store = Arc::new(MockStore::default());

        submit(
            state(Some(store.clone()), Arc::new(MockSink::default())),
            HeaderMap::new(),
            &canonical_body(),
        )
        .await;

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted[0].ip_hash, None);
        assert_eq!(inserted[0].user_agent, None);
    }

    #[tokio::test]
    async fn preflight_returns_204_with_allow_headers() {
        let response = preflight_handler().await.into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}

//! HTTP server for the RSVP service.
//!
//! This module implements the HTTP surface that:
//! - Accepts RSVP submissions, validates them, and writes them to the primary
//!   store and the spreadsheet mirror
//! - Answers cross-origin preflight checks (the static site is served from a
//!   different origin)
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /api/rsvp` - Accepts an RSVP submission (returns 200 on success)
//! - `OPTIONS /api/rsvp` - CORS preflight (returns 204)
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::sink::SheetSink;
use crate::store::RsvpStore;

pub mod health;
pub mod rsvp;

pub use health::health_handler;
pub use rsvp::{preflight_handler, rsvp_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It carries
/// the two write targets: the primary store (optional, since some deployment
/// environments have no database binding) and the spreadsheet sink.
pub struct AppState<S, N> {
    inner: Arc<AppStateInner<S, N>>,
}

struct AppStateInner<S, N> {
    /// Primary store handle, or `None` when the deployment has no database.
    store: Option<S>,

    /// Secondary sink for the spreadsheet mirror.
    sink: N,
}

impl<S, N> AppState<S, N> {
    /// Creates a new `AppState` with the given write targets.
    pub fn new(store: Option<S>, sink: N) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { store, sink }),
        }
    }

    /// Returns the primary store, if one is configured.
    pub fn store(&self) -> Option<&S> {
        self.inner.store.as_ref()
    }

    /// Returns the secondary sink.
    pub fn sink(&self) -> &N {
        &self.inner.sink
    }
}

// Derived Clone would require S: Clone and N: Clone; only the Arc is cloned.
impl<S, N> Clone for AppState<S, N> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builds the service router over the given state.
pub fn router<S, N>(state: AppState<S, N>) -> Router
where
    S: RsvpStore + Send + Sync + 'static,
    N: SheetSink + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/api/rsvp",
            post(rsvp_handler::<S, N>).options(preflight_handler),
        )
        .route("/health", get(health_handler))
        .with_state(state)
}

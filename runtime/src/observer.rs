//! # Observer
//!
//! The per-call handle a caller passes to watch requests, responses and
//! retries. Every hook defaults to doing nothing.

use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};

/// Receives notifications for one client call.
pub trait RequestObserver: Send + Sync {
    /// Called before each request is sent.
    fn on_request(&self, _request: &HttpRequest) {}

    /// Called for each response received, whatever its status.
    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}

    /// Called after a failed attempt, before waiting. `remaining` excludes the
    /// attempt about to start.
    fn on_retry(&self, _error: &ClientError, _remaining: u32) {}
}

/// Forwards every notification to `tracing` at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, request: &HttpRequest) {
        tracing::info!("--> {} {}", request.method, request.uri);
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        tracing::info!("<-- {} {} {}", response.status, request.method, request.uri);
    }

    fn on_retry(&self, error: &ClientError, remaining: u32) {
        tracing::info!("Retrying after '{}' ({} left)", error, remaining);
    }
}

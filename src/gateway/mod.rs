//! Axum HTTP gateway with body limits, timeouts, and per-client rate limiting.

mod defense;
mod handlers;
mod server;

pub use server::{build_app, build_state, run_gateway, run_gateway_with_listener};

use crate::analysis::ShelfAnalyzer;
use crate::security::FixedWindowRateLimiter;
use std::sync::Arc;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when no model credential is configured.
    pub analyzer: Option<Arc<ShelfAnalyzer>>,
    pub rate_limiter: Arc<FixedWindowRateLimiter>,
}

impl AppState {
    pub fn new(
        analyzer: Option<Arc<ShelfAnalyzer>>,
        rate_limiter: Arc<FixedWindowRateLimiter>,
    ) -> Self {
        Self {
            analyzer,
            rate_limiter,
        }
    }
}

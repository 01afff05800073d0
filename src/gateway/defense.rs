use crate::error::AnalysisError;
use crate::security::RateLimitDecision;
use crate::utils::text::non_blank;
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::time::Instant;

pub(super) const TOO_MANY_REQUESTS: &str = "Too many requests. Try again later.";
pub(super) const INVALID_IMAGE: &str = "Missing or invalid image file";
pub(super) const NOT_CONFIGURED: &str = "Analysis service not configured";
pub(super) const EMPTY_RESPONSE: &str = "Empty response from analysis service";
pub(super) const INVALID_OUTPUT: &str = "Analysis produced invalid output";
pub(super) const ANALYSIS_FAILED: &str = "Analysis failed";

/// Sentinel bucket for requests with no forwarding headers.
pub(super) const UNKNOWN_CLIENT: &str = "unknown";

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(non_blank)
}

/// Rate-limit key: first `X-Forwarded-For` hop, then `X-Real-IP`.
pub(super) fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_text(headers, "x-forwarded-for")
        && let Some(first) = forwarded
            .split(',')
            .next()
            .and_then(non_blank)
    {
        return first.to_string();
    }
    header_text(headers, "x-real-ip").unwrap_or(UNKNOWN_CLIENT).to_string()
}

pub(super) fn rate_limit_headers(decision: &RateLimitDecision, now: Instant) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "retry-after",
        HeaderValue::from(decision.retry_after_secs(now)),
    );
    headers
}

pub(super) fn error_response(
    status: StatusCode,
    message: &str,
    decision: Option<&RateLimitDecision>,
) -> Response {
    let body = Json(serde_json::json!({ "error": message }));
    match decision {
        Some(decision) => (
            status,
            rate_limit_headers(decision, Instant::now()),
            body,
        )
            .into_response(),
        None => (status, body).into_response(),
    }
}

/// Public message for a failed analysis. Details stay in the server log.
pub(super) fn analysis_error_message(error: &AnalysisError) -> &'static str {
    match error {
        AnalysisError::EmptyAnswer { rounds } => {
            tracing::error!(rounds, "analysis produced no final answer");
            EMPTY_RESPONSE
        }
        AnalysisError::InvalidOutput { reason, .. } => {
            tracing::error!(reason = %reason, "analysis produced invalid output");
            INVALID_OUTPUT
        }
        AnalysisError::Provider(source) | AnalysisError::ToolBridge(source) => {
            tracing::error!(error = %format!("{source:#}"), kind = %error, "analysis failed");
            ANALYSIS_FAILED
        }
    }
}

use crate::analysis::{ExplanationRequest, coerce_media_type};
use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::time::Instant;

use super::AppState;
use super::defense::{
    INVALID_IMAGE, NOT_CONFIGURED, TOO_MANY_REQUESTS, analysis_error_message, client_key,
    error_response, rate_limit_headers,
};

/// Multipart field carrying the shelf photo.
const IMAGE_FIELD: &str = "image";

pub(super) struct ImageUpload {
    pub(super) bytes: Bytes,
    pub(super) content_type: Option<String>,
}

/// First file part named `image`. Text parts, empty files, and malformed
/// bodies all count as missing.
async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Option<ImageUpload> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected analyze body");
            return None;
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return None,
            Err(error) => {
                tracing::debug!(error = %error, "malformed multipart body");
                return None;
            }
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        if field.file_name().is_none() {
            return None;
        }

        let content_type = field.content_type().map(ToString::to_string);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::debug!(error = %error, "failed to read image field");
                return None;
            }
        };
        if bytes.is_empty() {
            return None;
        }
        return Some(ImageUpload {
            bytes,
            content_type,
        });
    }
}

/// POST /api/analyze: multipart shelf photo in, cultural profile out
pub(super) async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let client = client_key(&headers);
    let decision = state.rate_limiter.check(&client);

    if !decision.allowed {
        tracing::warn!(client = %client, "analyze rate limit exceeded");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            TOO_MANY_REQUESTS,
            Some(&decision),
        );
    }

    let Some(upload) = read_image_field(multipart).await else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_IMAGE, Some(&decision));
    };

    let Some(analyzer) = state.analyzer.as_ref() else {
        tracing::error!("model API key is not set");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            NOT_CONFIGURED,
            Some(&decision),
        );
    };

    let media_type = coerce_media_type(upload.content_type.as_deref());
    tracing::info!(
        client = %client,
        bytes = upload.bytes.len(),
        media_type,
        "analyzing shelf photo"
    );

    match analyzer.analyze(&upload.bytes, media_type).await {
        Ok(result) => (
            StatusCode::OK,
            rate_limit_headers(&decision, Instant::now()),
            Json(result),
        )
            .into_response(),
        Err(error) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            analysis_error_message(&error),
            Some(&decision),
        ),
    }
}

/// POST /api/recommendations: templated explanation for one item
pub(super) async fn handle_recommendations(body: Bytes) -> Response {
    let request: ExplanationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::debug!(error = %error, "invalid recommendations payload");
            let message = if error.is_data() {
                "Request body must be a JSON object"
            } else {
                "Invalid JSON payload"
            };
            return error_response(StatusCode::BAD_REQUEST, message, None);
        }
    };

    match request.explanation() {
        Some(explanation) => {
            Json(serde_json::json!({ "explanation": explanation })).into_response()
        }
        None => error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: title, mediaType",
            None,
        ),
    }
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "analysis_configured": state.analyzer.is_some(),
    }))
}

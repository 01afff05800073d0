use crate::support::{GatewayTestServer, final_answer, model_reply, shelf_form};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHELF_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

const ANSWER: &str = r#"```json
{
  "detected_books": ["Stoner", "The Rings of Saturn", "Gilead"],
  "dominant_themes": ["memory", "quiet lives"],
  "reader_archetype": "The Elegist",
  "tone_profile": ["melancholic", "contemplative"],
  "recommendations": {
    "books_intro": "Slow books about attention.",
    "books": ["Austerlitz - W.G. Sebald"],
    "films": ["Paterson (2016)"],
    "music": [
      {"label": "Nick Drake - Pink Moon", "url": "https://open.spotify.com/track/abc"},
      {"label": "Low - Things We Lost in the Fire", "url": "spotify:track:xyz"}
    ],
    "podcasts": []
  }
}
```"#;

fn error_message(body: &Value) -> &str {
    body.get("error").and_then(Value::as_str).unwrap_or_default()
}

#[tokio::test]
async fn analyze_runs_tool_round_and_returns_normalized_profile() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(
            json!([{
                "type": "tool_use",
                "id": "toolu_1",
                "name": "search_spotify",
                "input": {"query": "Nick Drake Pink Moon"}
            }]),
            "tool_use",
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&model)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(final_answer(ANSWER)))
        .expect(1)
        .mount(&model)
        .await;

    let server = GatewayTestServer::with_model(&model.uri()).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze"))
        .multipart(shelf_form(SHELF_JPEG, "shelf.jpg", "image/jpeg"))
        .send()
        .await
        .expect("analyze request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-ratelimit-limit")
            .and_then(|v| v.to_str().ok()),
        Some("10")
    );
    assert_eq!(
        response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok()),
        Some("9")
    );

    let body: Value = response.json().await.expect("profile should be json");
    assert_eq!(body["reader_archetype"], "The Elegist");
    assert_eq!(body["detected_books"].as_array().map(Vec::len), Some(3));
    assert_eq!(
        body["recommendations"]["music"],
        json!([
            {"label": "Nick Drake - Pink Moon", "url": "https://open.spotify.com/track/abc"},
            {"label": "Low - Things We Lost in the Fire", "url": null}
        ])
    );
    assert_eq!(
        body["recommendations"]["books_intro"],
        "Slow books about attention."
    );
    assert!(body["recommendations"].get("films_intro").is_none());

    let requests = model.received_requests().await.expect("requests are recorded");
    assert_eq!(requests.len(), 2);

    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(
        first["system"]
            .as_str()
            .is_some_and(|system| system.contains("reader_archetype"))
    );
    assert_eq!(first["messages"][0]["content"][0]["type"], "image");
    assert_eq!(
        first["messages"][0]["content"][0]["source"]["media_type"],
        "image/jpeg"
    );

    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let messages = second["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "assistant");
    let tool_result = &messages[2]["content"][0];
    assert_eq!(tool_result["type"], "tool_result");
    assert_eq!(tool_result["tool_use_id"], "toolu_1");
    assert_eq!(tool_result["is_error"], true);
}

#[tokio::test]
async fn analyze_rate_limits_each_client_separately() {
    let server = GatewayTestServer::start(|config| {
        config.rate_limit.max_requests = 2;
    })
    .await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(server.url("/api/analyze"))
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .multipart(reqwest::multipart::Form::new().text("note", "no image"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let limited = client
        .post(server.url("/api/analyze"))
        .header("x-forwarded-for", "203.0.113.7")
        .multipart(shelf_form(SHELF_JPEG, "shelf.jpg", "image/jpeg"))
        .send()
        .await
        .unwrap();
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        limited
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok()),
        Some("0")
    );
    let retry_after: u64 = limited
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("429 carries retry-after");
    assert!(retry_after > 0 && retry_after <= 3600);
    let body: Value = limited.json().await.unwrap();
    assert_eq!(error_message(&body), "Too many requests. Try again later.");

    let other_client = client
        .post(server.url("/api/analyze"))
        .header("x-real-ip", "198.51.100.2")
        .multipart(reqwest::multipart::Form::new().text("note", "no image"))
        .send()
        .await
        .unwrap();
    assert_eq!(other_client.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_without_api_key_reports_not_configured() {
    let server = GatewayTestServer::start(|_| {}).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/analyze"))
        .multipart(shelf_form(SHELF_JPEG, "shelf.jpg", "image/jpeg"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_message(&body), "Analysis service not configured");
}

#[tokio::test]
async fn analyze_rejects_unparseable_model_output() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(final_answer("Sorry, I can't make out any spines.")),
        )
        .mount(&model)
        .await;

    let server = GatewayTestServer::with_model(&model.uri()).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze"))
        .multipart(shelf_form(SHELF_JPEG, "shelf.png", "image/png"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_message(&body), "Analysis produced invalid output");
}

#[tokio::test]
async fn analyze_maps_upstream_failure_to_generic_error() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&model)
        .await;

    let server = GatewayTestServer::with_model(&model.uri()).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze"))
        .multipart(shelf_form(SHELF_JPEG, "shelf.webp", "image/webp"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_message(&body), "Analysis failed");
    assert!(!body.to_string().contains("sk-ant-test-key"));
}

#[tokio::test]
async fn unsupported_media_type_is_sent_as_jpeg() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(final_answer(
            r#"{"detected_books": [], "reader_archetype": "Unknown"}"#,
        )))
        .mount(&model)
        .await;

    let server = GatewayTestServer::with_model(&model.uri()).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze"))
        .multipart(shelf_form(SHELF_JPEG, "shelf.heic", "image/heic"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detected_books"], json!([]));

    let requests = model.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        sent["messages"][0]["content"][0]["source"]["media_type"],
        "image/jpeg"
    );
}

#[tokio::test]
async fn health_reports_whether_analysis_is_configured() {
    let model = MockServer::start().await;
    let configured = GatewayTestServer::with_model(&model.uri()).await;
    let unconfigured = GatewayTestServer::start(|_| {}).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(configured.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": "ok", "analysis_configured": true}));

    let body: Value = client
        .get(unconfigured.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["analysis_configured"], false);
}

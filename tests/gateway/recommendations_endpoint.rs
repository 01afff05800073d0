use crate::support::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn explanation_is_generated_without_model_access() {
    let server = GatewayTestServer::start(|_| {}).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/recommendations"))
        .json(&json!({
            "mediaType": "film",
            "title": "Paterson",
            "author": "Jim Jarmusch",
            "year": "2016",
            "seedTitles": ["Stoner", "Gilead"]
        }))
        .send()
        .await
        .expect("recommendations request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let explanation = body["explanation"].as_str().unwrap();
    assert!(explanation.contains("Paterson by Jim Jarmusch"));
    assert!(explanation.ends_with("Worth meeting."));
}

#[tokio::test]
async fn explanation_requires_title_and_media_type() {
    let server = GatewayTestServer::start(|_| {}).await;
    let client = reqwest::Client::new();

    for payload in [
        json!({"mediaType": "book"}),
        json!({"title": "Austerlitz"}),
        json!({"mediaType": "", "title": "Austerlitz"}),
    ] {
        let response = client
            .post(server.url("/api/recommendations"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing required fields: title, mediaType");
    }
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let server = GatewayTestServer::start(|_| {}).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/recommendations"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON payload");
}

#[tokio::test]
async fn numeric_year_is_accepted() {
    let server = GatewayTestServer::start(|_| {}).await;

    let response = reqwest::Client::new()
        .post(server.url("/api/recommendations"))
        .json(&json!({
            "mediaType": "music",
            "title": "Pink Moon",
            "author": "Nick Drake",
            "year": 1972
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["explanation"]
            .as_str()
            .is_some_and(|text| text.contains("Pink Moon by Nick Drake"))
    );
}

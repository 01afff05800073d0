use afterword::config::Config;
use afterword::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _workspace: TempDir,
}

impl GatewayTestServer {
    /// Serve `configure(config)` on an ephemeral port. Tools are disabled and
    /// no API key is set unless the closure says otherwise.
    pub async fn start(configure: impl FnOnce(&mut Config)) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.config_path = workspace.path().join("config.toml");
        config.provider.api_key = None;
        config.mcp.enabled = false;
        configure(&mut config);

        let host = "127.0.0.1".to_string();
        let config = Arc::new(config);
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _workspace: workspace,
        }
    }

    /// Serve with the model pointed at `model_base_url`.
    pub async fn with_model(model_base_url: &str) -> Self {
        let base_url = model_base_url.to_string();
        Self::start(move |config| {
            config.provider.api_key = Some("sk-ant-test-key".to_string());
            config.provider.base_url = Some(base_url);
        })
        .await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

/// Multipart body carrying one shelf photo in the `image` field.
pub fn shelf_form(bytes: &[u8], file_name: &str, mime: &str) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str(mime)
        .expect("test mime type should parse");
    Form::new().part("image", part)
}

/// Messages API response body with the given content blocks.
pub fn model_reply(content: Value, stop_reason: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-6",
        "content": content,
        "stop_reason": stop_reason,
        "usage": {"input_tokens": 1200, "output_tokens": 300}
    })
}

pub fn final_answer(text: &str) -> Value {
    model_reply(json!([{"type": "text", "text": text}]), "end_turn")
}

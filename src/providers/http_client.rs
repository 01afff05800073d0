use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Shared client for model calls. `timeout_secs` bounds one whole request,
/// including the upload of the base64 photo.
pub fn build_provider_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent(concat!("afterword/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(error = %error, "Falling back to default HTTP client");
            Client::new()
        })
}

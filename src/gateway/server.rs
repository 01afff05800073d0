use super::AppState;
use super::handlers::{handle_analyze, handle_health, handle_recommendations};

use crate::analysis::ShelfAnalyzer;
use crate::config::Config;
use crate::security::FixedWindowRateLimiter;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Host as the resolver expects it: IPv6 literals lose their brackets.
fn bind_host(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host)
}

/// Bind `host:port`, resolving names such as `localhost`.
async fn bind_listener(host: &str, port: u16) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((bind_host(host), port))
        .await
        .with_context(|| format!("bind gateway socket on {host}:{port}"))
}

/// Run the HTTP gateway using axum with proper HTTP/1.1 compliance.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be exposed beyond this machine.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let listener = bind_listener(host, port).await?;
    run_gateway_with_listener(host, listener, config).await
}

/// Wire the analyzer and rate limiter from config. A missing API key leaves
/// the analyzer unset so requests fail with a configuration error.
pub fn build_state(config: &Config) -> AppState {
    let analyzer = ShelfAnalyzer::from_config(config).map(Arc::new);
    if analyzer.is_none() {
        tracing::warn!("no model API key configured; /api/analyze will return 500");
    }

    AppState::new(
        analyzer,
        Arc::new(FixedWindowRateLimiter::from_config(&config.rate_limit)),
    )
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_state(&config);
    print_gateway_banner(&display_addr, &state);

    let app = build_app(
        state,
        &config.gateway.cors_origins,
        config.gateway.max_body_bytes,
        Duration::from_secs(config.gateway.request_timeout_secs),
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down gateway");
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!("Gateway listening on {display_addr}");
    println!("  POST /api/analyze");
    println!("  POST /api/recommendations");
    println!("  GET  /health");
    if state.analyzer.is_none() {
        println!("  Model API key missing: analysis disabled");
    }
    println!(
        "  Rate limit: {} requests per window per client",
        state.rate_limiter.limit()
    );
}

pub fn build_app(
    state: AppState,
    cors_origins: &[String],
    max_body_bytes: usize,
    request_timeout: Duration,
) -> Router {
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/recommendations", post(handle_recommendations))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    if !cors_origins.is_empty() {
        let origins: Vec<_> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        );
    }

    app
}

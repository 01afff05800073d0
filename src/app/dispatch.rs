use crate::cli::commands::{Cli, Commands};
use afterword::Config;
use afterword::analysis::{ShelfAnalyzer, media_type_for_path};
use afterword::error::{AfterwordError, LlmError};
use afterword::gateway;
use afterword::mcp::tool_factory;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Analyze one photo from disk, outside the HTTP service. Runs the same
/// orchestration as `POST /api/analyze`, without rate limiting.
async fn run_analyze(config: &Config, image: &Path, compact: bool) -> Result<()> {
    let analyzer = ShelfAnalyzer::from_config(config).ok_or_else(|| {
        AfterwordError::from(LlmError::MissingCredentials {
            provider: "anthropic".into(),
        })
    })?;

    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image {}", image.display()))?;
    let media_type = media_type_for_path(image);
    info!(path = %image.display(), media_type, bytes = bytes.len(), "analyzing shelf photo");

    let result = analyzer
        .analyze(&bytes, media_type)
        .await
        .map_err(AfterwordError::from)?;

    let rendered = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{rendered}");
    Ok(())
}

/// Spawn the tool provider once and print what it advertises.
async fn run_tools(config: &Config) -> Result<()> {
    let factory = tool_factory(&config.mcp);
    let provider = factory.connect().await?;
    let listed = provider.list_tools().await;
    provider.close().await;

    let specs = listed?;
    if specs.is_empty() {
        println!("No tools available.");
        return Ok(());
    }

    println!("{} tool(s):", specs.len());
    for spec in specs {
        println!("  {:<24} {}", spec.name, spec.description);
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            info!("Starting gateway on {host}:{port}");
            gateway::run_gateway(&host, port, config).await
        }

        Commands::Analyze { image, compact } => run_analyze(&config, &image, compact).await,

        Commands::Tools => run_tools(&config).await,
    }
}

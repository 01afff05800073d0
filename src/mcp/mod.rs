//! MCP stdio client for the track-lookup tool server.
//!
//! One subprocess per analysis request: [`McpToolBridgeFactory`] spawns it,
//! [`McpToolBridge`] exposes its tools to the orchestration loop and kills it
//! on close.

pub mod bridge;
pub mod connection;
pub mod content;

pub use bridge::{McpToolBridge, McpToolBridgeFactory};
pub use connection::McpConnection;
pub use content::{extract_result_text, tool_spec_from_rmcp};

use crate::config::McpConfig;
use crate::tools::{NoTools, ToolProviderFactory};
use std::sync::Arc;

/// Tool factory for the configured provider. With MCP disabled the model runs
/// without tools.
pub fn tool_factory(config: &McpConfig) -> Arc<dyn ToolProviderFactory> {
    if config.enabled {
        Arc::new(McpToolBridgeFactory::new(config.clone()))
    } else {
        tracing::warn!("MCP tool provider disabled; music links will not be verified");
        Arc::new(NoTools)
    }
}

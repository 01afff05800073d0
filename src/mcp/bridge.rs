use super::connection::McpConnection;
use super::content::{extract_result_text, tool_spec_from_rmcp};
use crate::config::McpConfig;
use crate::error::ToolError;
use crate::tools::{ToolInvocation, ToolOutcome, ToolProvider, ToolProviderFactory, ToolSpec};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use std::sync::Arc;

/// [`ToolProvider`] backed by one MCP stdio session.
pub struct McpToolBridge {
    connection: McpConnection,
}

impl McpToolBridge {
    pub fn new(connection: McpConnection) -> Self {
        Self { connection }
    }

    fn outcome_from_result(id: &str, result: &CallToolResult) -> ToolOutcome {
        let text = extract_result_text(&result.content);
        if result.is_error.unwrap_or(false) {
            ToolOutcome::failure(id, text)
        } else {
            ToolOutcome::success(id, text)
        }
    }
}

#[async_trait]
impl ToolProvider for McpToolBridge {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolSpec>> {
        let tools = self.connection.list_tools().await?;
        Ok(tools.iter().map(tool_spec_from_rmcp).collect())
    }

    async fn invoke(&self, invocation: &ToolInvocation) -> ToolOutcome {
        match self
            .connection
            .call_tool(&invocation.name, invocation.arguments.clone())
            .await
        {
            Ok(result) => Self::outcome_from_result(&invocation.id, &result),
            Err(error) => {
                let error = ToolError::Execution {
                    name: invocation.name.clone(),
                    message: format!("{error:#}"),
                };
                tracing::warn!(error = %error, "MCP tool call failed");
                ToolOutcome::failure(invocation.id.clone(), error.to_string())
            }
        }
    }

    async fn close(&self) {
        if let Err(error) = self.connection.shutdown().await {
            tracing::warn!(
                command = %self.connection.command(),
                error = %error,
                "failed to close MCP connection"
            );
        }
    }
}

/// Spawns the configured MCP server for each request.
#[derive(Debug, Clone)]
pub struct McpToolBridgeFactory {
    config: McpConfig,
}

impl McpToolBridgeFactory {
    pub fn new(config: McpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ToolProviderFactory for McpToolBridgeFactory {
    async fn connect(&self) -> anyhow::Result<Arc<dyn ToolProvider>> {
        let connection = McpConnection::connect_stdio(
            &self.config.command,
            &self.config.args,
            &self.config.env,
            self.config.max_call_seconds,
        )
        .await
        .map_err(|error| ToolError::Connection(format!("{error:#}")))?;
        Ok(Arc::new(McpToolBridge::new(connection)))
    }
}

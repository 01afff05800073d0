use anyhow::{Context, Result, anyhow};
use rmcp::model::{CallToolRequestParams, CallToolResult};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::ServiceExt;
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::RwLock;

type McpService = RunningService<RoleClient, ()>;

/// A live stdio session with one MCP server subprocess.
pub struct McpConnection {
    command: String,
    service: RwLock<Option<McpService>>,
    max_call_seconds: u64,
}

impl McpConnection {
    pub async fn connect_stdio(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
        max_call_seconds: u64,
    ) -> Result<Self> {
        let service = ()
            .serve(TokioChildProcess::new(Command::new(command).configure(
                |cmd| {
                    cmd.args(args);
                    cmd.envs(env.iter());
                },
            ))?)
            .await
            .with_context(|| format!("failed to connect MCP server '{command}' over stdio"))?;

        tracing::debug!(command, "MCP server connected");

        Ok(Self {
            command: command.to_string(),
            service: RwLock::new(Some(service)),
            max_call_seconds,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub async fn list_tools(&self) -> Result<Vec<rmcp::model::Tool>> {
        let service_guard = self.service.read().await;
        let service = service_guard
            .as_ref()
            .ok_or_else(|| anyhow!("MCP connection '{}' is not active", self.command))?;

        service
            .list_all_tools()
            .await
            .with_context(|| format!("failed to list tools for MCP server '{}'", self.command))
    }

    /// Call one tool, bounded by `max_call_seconds`. Arguments must be a JSON
    /// object (or null for none).
    pub async fn call_tool(
        &self,
        tool_name: &str,
        args: serde_json::Value,
    ) -> Result<CallToolResult> {
        let arguments = match args {
            serde_json::Value::Object(object) => Some(object),
            serde_json::Value::Null => None,
            _ => {
                return Err(anyhow!(
                    "MCP tool '{tool_name}' requires JSON object arguments"
                ));
            }
        };

        let request = CallToolRequestParams {
            meta: None,
            name: tool_name.to_string().into(),
            arguments,
            task: None,
        };

        let service_guard = self.service.read().await;
        let service = service_guard
            .as_ref()
            .ok_or_else(|| anyhow!("MCP connection '{}' is not active", self.command))?;

        tokio::time::timeout(
            Duration::from_secs(self.max_call_seconds),
            service.call_tool(request),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "MCP tool '{tool_name}' timed out after {}s",
                self.max_call_seconds
            )
        })?
        .with_context(|| format!("MCP tool '{tool_name}' call failed"))
    }

    /// Stop the session and reap the child. Safe to call more than once.
    pub async fn shutdown(&self) -> Result<()> {
        let service = self.service.write().await.take();
        if let Some(service) = service {
            service
                .cancel()
                .await
                .with_context(|| format!("failed to shutdown MCP server '{}'", self.command))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn disconnected_for_test(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            service: RwLock::new(None),
            max_call_seconds: 30,
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::providers::ContentBlock;

/// Description of a tool for the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Result of one invocation, keyed by the invocation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub id: String,
    /// Result text on success, error message on failure.
    pub content: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(id: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: id.into(),
            content: if message.trim().is_empty() {
                "Tool execution failed".to_string()
            } else {
                message
            },
            is_error: true,
        }
    }

    /// Tool-result block fed back to the model. Failures are prefixed with
    /// `Error:` so the model can tell them from empty search results.
    pub fn to_content_block(&self) -> ContentBlock {
        let content = if self.is_error {
            format!("Error: {}", self.content)
        } else {
            self.content.clone()
        };
        ContentBlock::ToolResult {
            tool_use_id: self.id.clone(),
            content,
            is_error: self.is_error,
        }
    }
}

/// A connected source of callable tools, scoped to one request.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolSpec>>;

    /// Execute one call. Never fails: transport and execution errors come
    /// back as failure outcomes.
    async fn invoke(&self, invocation: &ToolInvocation) -> ToolOutcome;

    /// Release the connection. Errors are logged and swallowed.
    async fn close(&self) {}
}

/// Opens a fresh [`ToolProvider`] connection for each request.
#[async_trait]
pub trait ToolProviderFactory: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Arc<dyn ToolProvider>>;
}

/// Provider with no tools, used when the tool subprocess is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTools;

#[async_trait]
impl ToolProvider for NoTools {
    async fn list_tools(&self) -> anyhow::Result<Vec<ToolSpec>> {
        Ok(Vec::new())
    }

    async fn invoke(&self, invocation: &ToolInvocation) -> ToolOutcome {
        ToolOutcome::failure(
            invocation.id.clone(),
            format!("tool '{}' is not available", invocation.name),
        )
    }
}

#[async_trait]
impl ToolProviderFactory for NoTools {
    async fn connect(&self) -> anyhow::Result<Arc<dyn ToolProvider>> {
        Ok(Arc::new(NoTools))
    }
}

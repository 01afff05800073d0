use super::response::{ProviderMessage, ProviderResponse};
use crate::tools::ToolSpec;
use async_trait::async_trait;

/// A model that converses over a message history with optional tools.
///
/// Model id, token limits and sampling settings belong to the implementation;
/// the orchestration loop only supplies the conversation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider label used in logs and errors.
    fn name(&self) -> &str;

    async fn chat_with_tools(
        &self,
        system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> anyhow::Result<ProviderResponse>;
}

use super::anthropic_types::{
    MessagesRequest, MessagesResponse, ReplyBlock, WireBlock, WireImageSource, WireMessage,
    WireTool,
};
use super::http_client::build_provider_client_with_timeout;
use super::{
    ContentBlock, ImageSource, MessageRole, ProviderMessage, ProviderResponse, StopReason,
    api_error, traits::Provider,
};
use crate::config::ProviderConfig;
use crate::error::LlmError;
use crate::tools::ToolSpec;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "anthropic";

/// Anthropic Messages API client.
pub struct AnthropicProvider {
    api_key: Option<String>,
    messages_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
    client: Client,
}

impl AnthropicProvider {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let base = config
            .base_url
            .as_deref()
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'));
        Self {
            api_key: config.resolved_api_key().map(ToString::to_string),
            messages_url: format!("{base}/v1/messages"),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client: build_provider_client_with_timeout(config.timeout_secs),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn wire_block(block: &ContentBlock) -> WireBlock<'_> {
        match block {
            ContentBlock::Text { text } => WireBlock::Text { text },
            ContentBlock::Image {
                source: ImageSource::Base64 { media_type, data },
            } => WireBlock::Image {
                source: WireImageSource::Base64 { media_type, data },
            },
            ContentBlock::ToolUse { id, name, input } => WireBlock::ToolUse { id, name, input },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => WireBlock::ToolResult {
                tool_use_id,
                content,
                is_error: *is_error,
            },
        }
    }

    fn wire_message(message: &ProviderMessage) -> WireMessage<'_> {
        WireMessage {
            role: match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            },
            content: message.content.iter().map(Self::wire_block).collect(),
        }
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: system_prompt,
            messages: messages.iter().map(Self::wire_message).collect(),
            tools: tools
                .iter()
                .map(|tool| WireTool {
                    name: &tool.name,
                    description: &tool.description,
                    input_schema: &tool.parameters,
                })
                .collect(),
            temperature: self.temperature,
        }
    }

    fn map_stop_reason(stop_reason: Option<&str>) -> Option<StopReason> {
        stop_reason.map(|reason| match reason {
            "end_turn" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            "max_tokens" => StopReason::MaxTokens,
            "stop_sequence" => StopReason::StopSequence,
            _ => StopReason::Other,
        })
    }

    fn reply_blocks(blocks: Vec<ReplyBlock>) -> Vec<ContentBlock> {
        blocks
            .into_iter()
            .filter_map(|block| match block {
                ReplyBlock::Text { text } => Some(ContentBlock::Text { text }),
                ReplyBlock::ToolUse { id, name, input } => {
                    Some(ContentBlock::ToolUse { id, name, input })
                }
                ReplyBlock::Skipped => None,
            })
            .collect()
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> anyhow::Result<MessagesResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredentials {
                provider: PROVIDER.into(),
            })?;

        let response = self
            .client
            .post(&self.messages_url)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("x-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|error| LlmError::Request {
                provider: PROVIDER.into(),
                message: error.without_url().to_string(),
            })?;

        if !response.status().is_success() {
            return Err(api_error("Anthropic", response).await);
        }

        response
            .json()
            .await
            .context("decode Anthropic Messages response")
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn chat_with_tools(
        &self,
        system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> anyhow::Result<ProviderResponse> {
        let request = self.build_request(system_prompt, messages, tools);
        let reply = self.send(&request).await?;
        tracing::debug!(
            stop_reason = reply.stop_reason.as_deref().unwrap_or("none"),
            blocks = reply.content.len(),
            "anthropic reply"
        );

        let mut response = ProviderResponse::new(
            Self::reply_blocks(reply.content),
            Self::map_stop_reason(reply.stop_reason.as_deref()),
        );
        if let Some(usage) = reply.usage {
            response = response.with_usage(usage.input_tokens, usage.output_tokens);
        }
        if let Some(model) = reply.model {
            response = response.with_model(model);
        }
        Ok(response)
    }
}

//! Shelf photo analysis: one tool-augmented conversation per image, then
//! strict parsing and lenient normalization of the model's JSON answer.

pub mod answer;
pub mod explain;
pub mod media;
pub mod normalize;
pub mod prompt;
pub mod types;

pub use answer::{parse_answer, strip_code_fences};
pub use explain::ExplanationRequest;
pub use media::{coerce_media_type, media_type_for_path};
pub use normalize::normalize;
pub use types::{AnalysisResult, MusicRecommendation, Recommendations};

use crate::agent::ToolLoop;
use crate::config::{AnalysisConfig, Config};
use crate::error::AnalysisError;
use crate::providers::{AnthropicProvider, ImageSource, Provider, ProviderMessage};
use crate::tools::{ToolProvider, ToolProviderFactory};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;
use std::time::Duration;

pub struct ShelfAnalyzer {
    provider: Arc<dyn Provider>,
    tools: Arc<dyn ToolProviderFactory>,
    tool_loop: ToolLoop,
}

impl ShelfAnalyzer {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<dyn ToolProviderFactory>,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            tool_loop: ToolLoop::new(
                config.effective_max_rounds(),
                Duration::from_secs(config.model_call_timeout_secs),
            ),
        }
    }

    /// Wire the Anthropic provider and the configured tool provider. `None`
    /// when no API key is available.
    pub fn from_config(config: &Config) -> Option<Self> {
        let provider = AnthropicProvider::from_config(&config.provider);
        if !provider.has_credentials() {
            return None;
        }
        Some(Self::new(
            Arc::new(provider),
            crate::mcp::tool_factory(&config.mcp),
            &config.analysis,
        ))
    }

    /// Analyze one shelf photo. The tool connection opened for this call is
    /// closed before returning, whatever the outcome.
    pub async fn analyze(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let bridge = self
            .tools
            .connect()
            .await
            .map_err(AnalysisError::ToolBridge)?;

        let answer = self.converse(&bridge, image, media_type).await;
        bridge.close().await;

        let value = parse_answer(&answer?)?;
        let result = normalize(&value);
        if result.is_empty_shelf() {
            tracing::info!(
                archetype = %result.reader_archetype,
                "no readable books detected on the shelf"
            );
        }
        Ok(result)
    }

    async fn converse(
        &self,
        bridge: &Arc<dyn ToolProvider>,
        image: &[u8],
        media_type: &str,
    ) -> Result<String, AnalysisError> {
        let tool_specs = bridge
            .list_tools()
            .await
            .map_err(AnalysisError::ToolBridge)?;
        tracing::debug!(tools = tool_specs.len(), "tool provider ready");

        let opening = ProviderMessage::user_with_image(
            ImageSource::base64(media_type, STANDARD.encode(image)),
            prompt::INSTRUCTION,
        );

        let result = self
            .tool_loop
            .run(
                self.provider.as_ref(),
                Arc::clone(bridge),
                &tool_specs,
                prompt::SYSTEM_PROMPT,
                opening,
            )
            .await
            .map_err(AnalysisError::Provider)?;

        tracing::info!(
            rounds = result.rounds,
            tool_calls = result.tool_calls.len(),
            tokens = ?result.tokens_used,
            model = result.model.as_deref().unwrap_or("unreported"),
            stop_reason = ?result.stop_reason,
            "analysis conversation finished"
        );

        result.final_text.ok_or(AnalysisError::EmptyAnswer {
            rounds: result.rounds,
        })
    }
}

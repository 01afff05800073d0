use crate::providers::ProviderMessage;
use crate::tools::ToolOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use crate::config::MAX_ROUNDS_HARD_CAP;

/// Drives model calls and tool rounds for one request.
pub struct ToolLoop {
    pub(crate) max_rounds: u32,
    pub(crate) model_call_timeout: Duration,
}

/// Position in the orchestration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    AwaitingModel,
    DispatchingTools,
    Done,
    Failed,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStopReason {
    /// The model answered without requesting tools.
    Completed,
    /// The round budget ran out while the model still wanted tools.
    MaxRounds,
    /// The model stopped without any text to use as an answer.
    NoText,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub args: serde_json::Value,
    pub outcome: ToolOutcome,
    pub round: u32,
}

#[derive(Debug, Clone)]
pub struct ToolLoopResult {
    /// First text block of the final model response.
    pub final_text: Option<String>,
    pub state: LoopState,
    pub stop_reason: LoopStopReason,
    /// Model calls made, including the last one.
    pub rounds: u32,
    pub tool_calls: Vec<ToolCallRecord>,
    pub tokens_used: Option<u64>,
    /// Model name reported by the most recent response that carried one.
    pub model: Option<String>,
    pub messages: Vec<ProviderMessage>,
}

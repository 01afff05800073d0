use crate::error::LlmError;
use crate::providers::{Provider, ProviderMessage, ProviderResponse};
use crate::tools::{ToolInvocation, ToolOutcome, ToolProvider, ToolSpec};
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinSet};

use super::conversation::Conversation;
use super::tool_types::MAX_ROUNDS_HARD_CAP;

pub use super::tool_types::{LoopState, LoopStopReason, ToolCallRecord, ToolLoop, ToolLoopResult};

/// Run every invocation of one round concurrently and collect one outcome
/// per invocation, in invocation order. A task that panics yields a failure.
///
/// The tasks live in a `JoinSet`, so dropping this future mid-round aborts
/// them and releases their handle on `tools`.
pub async fn dispatch_round(
    tools: &Arc<dyn ToolProvider>,
    invocations: &[ToolInvocation],
) -> Vec<ToolOutcome> {
    let mut tasks = JoinSet::new();
    let mut slots: HashMap<task::Id, usize> = HashMap::with_capacity(invocations.len());
    for (slot, invocation) in invocations.iter().cloned().enumerate() {
        let tools = Arc::clone(tools);
        let handle = tasks.spawn(async move { tools.invoke(&invocation).await });
        slots.insert(handle.id(), slot);
    }

    let mut finished: Vec<Option<Result<ToolOutcome, String>>> = vec![None; invocations.len()];
    while let Some(joined) = tasks.join_next_with_id().await {
        let (task_id, result) = match joined {
            Ok((task_id, outcome)) => (task_id, Ok(outcome)),
            Err(error) => (error.id(), Err(error.to_string())),
        };
        if let Some(&slot) = slots.get(&task_id) {
            finished[slot] = Some(result);
        }
    }

    invocations
        .iter()
        .zip(finished)
        .map(|(invocation, result)| {
            let id = invocation.id.clone();
            match result {
                Some(Ok(outcome)) => ToolOutcome { id, ..outcome },
                Some(Err(error)) => {
                    tracing::warn!(id = %id, tool = %invocation.name, error = %error, "tool task aborted");
                    ToolOutcome::failure(id, format!("tool task aborted: {error}"))
                }
                None => ToolOutcome::failure(id, "no result produced"),
            }
        })
        .collect()
}

impl ToolLoop {
    pub fn new(max_rounds: u32, model_call_timeout: Duration) -> Self {
        Self {
            max_rounds: max_rounds.clamp(1, MAX_ROUNDS_HARD_CAP),
            model_call_timeout,
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Converse until the model answers, stops without text, or the round
    /// budget runs out. Model failures and timeouts are returned as errors;
    /// tool failures are fed back to the model.
    pub async fn run(
        &self,
        provider: &dyn Provider,
        tools: Arc<dyn ToolProvider>,
        tool_specs: &[ToolSpec],
        system_prompt: &str,
        opening: ProviderMessage,
    ) -> anyhow::Result<ToolLoopResult> {
        let mut conversation = Conversation::new(opening);
        let mut state = LoopState::AwaitingModel;
        let mut stop_reason = LoopStopReason::Completed;
        let mut pending: Vec<ToolInvocation> = Vec::new();
        let mut final_text = None;
        let mut tool_calls = Vec::new();
        let mut rounds = 0_u32;
        let mut token_sum = 0_u64;
        let mut saw_tokens = false;
        let mut model: Option<String> = None;

        while !state.is_terminal() {
            state = match state {
                LoopState::AwaitingModel => {
                    rounds += 1;
                    let response = self
                        .chat_once(provider, system_prompt, &conversation, tool_specs, rounds)
                        .await?;

                    if let Some(tokens) = response.total_tokens() {
                        token_sum = token_sum.saturating_add(tokens);
                        saw_tokens = true;
                    }
                    if response.model.is_some() {
                        model.clone_from(&response.model);
                    }

                    if response.wants_tools() {
                        if rounds >= self.max_rounds {
                            tracing::warn!(rounds, "round budget exhausted with tools pending");
                            stop_reason = LoopStopReason::MaxRounds;
                            LoopState::Failed
                        } else {
                            pending = response.tool_invocations();
                            conversation.push_assistant(&response);
                            LoopState::DispatchingTools
                        }
                    } else if let Some(text) = response.first_text() {
                        final_text = Some(text.to_string());
                        conversation.push_assistant(&response);
                        LoopState::Done
                    } else {
                        tracing::warn!(rounds, "model stopped without text");
                        stop_reason = LoopStopReason::NoText;
                        LoopState::Failed
                    }
                }
                LoopState::DispatchingTools => {
                    tracing::info!(round = rounds, tools = pending.len(), "dispatching tool calls");
                    let outcomes = dispatch_round(&tools, &pending).await;

                    for (invocation, outcome) in pending.drain(..).zip(&outcomes) {
                        if outcome.is_error {
                            tracing::warn!(
                                tool = %invocation.name,
                                error = %outcome.content,
                                "tool call failed"
                            );
                        }
                        tool_calls.push(ToolCallRecord {
                            tool_name: invocation.name,
                            args: invocation.arguments,
                            outcome: outcome.clone(),
                            round: rounds,
                        });
                    }

                    conversation.push_tool_results(&outcomes);
                    LoopState::AwaitingModel
                }
                LoopState::Done | LoopState::Failed => state,
            };
        }

        tracing::debug!(rounds, state = ?state, stop_reason = ?stop_reason, "tool loop finished");

        Ok(ToolLoopResult {
            final_text,
            state,
            stop_reason,
            rounds,
            tool_calls,
            tokens_used: saw_tokens.then_some(token_sum),
            model,
            messages: conversation.into_messages(),
        })
    }

    async fn chat_once(
        &self,
        provider: &dyn Provider,
        system_prompt: &str,
        conversation: &Conversation,
        tool_specs: &[ToolSpec],
        round: u32,
    ) -> anyhow::Result<ProviderResponse> {
        debug_assert!(conversation.is_ready_for_model());

        tokio::time::timeout(
            self.model_call_timeout,
            provider.chat_with_tools(Some(system_prompt), conversation.messages(), tool_specs),
        )
        .await
        .map_err(|_| LlmError::Timeout {
            provider: provider.name().to_string(),
            timeout_secs: self.model_call_timeout.as_secs(),
        })?
        .with_context(|| format!("model call failed in round {round}"))
    }
}

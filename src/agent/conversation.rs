use crate::providers::{ContentBlock, MessageRole, ProviderMessage, ProviderResponse};
use crate::tools::ToolOutcome;
use std::collections::HashSet;

/// Turn history for one analysis request.
///
/// Every tool-use block in an assistant turn is answered by exactly one
/// tool-result block in the next user turn; `push_tool_results` enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<ProviderMessage>,
}

impl Conversation {
    pub fn new(opening: ProviderMessage) -> Self {
        Self {
            messages: vec![opening],
        }
    }

    pub fn messages(&self) -> &[ProviderMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<ProviderMessage> {
        self.messages
    }

    pub fn push_assistant(&mut self, response: &ProviderResponse) {
        self.messages.push(response.to_assistant_message());
    }

    /// Tool-use ids in the latest assistant turn that have no result yet.
    pub fn unanswered_tool_uses(&self) -> Vec<&str> {
        let Some(last) = self.messages.last() else {
            return Vec::new();
        };
        if last.role != MessageRole::Assistant {
            return Vec::new();
        }
        last.tool_use_ids().collect()
    }

    /// Whether the history can be sent to the model as is.
    pub fn is_ready_for_model(&self) -> bool {
        self.unanswered_tool_uses().is_empty()
    }

    /// Append one user turn answering the latest assistant turn.
    ///
    /// Outcomes for unknown or repeated ids are dropped, and any tool use left
    /// without an outcome is answered with a failure.
    pub fn push_tool_results(&mut self, outcomes: &[ToolOutcome]) {
        let pending: Vec<String> = self
            .unanswered_tool_uses()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        if pending.is_empty() {
            if !outcomes.is_empty() {
                tracing::warn!(
                    count = outcomes.len(),
                    "dropping tool outcomes with no pending tool use"
                );
            }
            return;
        }

        let mut answered: HashSet<&str> = HashSet::new();
        let mut blocks: Vec<ContentBlock> = Vec::with_capacity(pending.len());

        for outcome in outcomes {
            if !pending.iter().any(|id| id == &outcome.id) || !answered.insert(&outcome.id) {
                tracing::warn!(id = %outcome.id, "dropping unexpected tool outcome");
                continue;
            }
            blocks.push(outcome.to_content_block());
        }

        for id in &pending {
            if !answered.contains(id.as_str()) {
                blocks.push(ToolOutcome::failure(id.clone(), "no result produced").to_content_block());
            }
        }

        self.messages.push(ProviderMessage::tool_results(blocks));
    }
}

use crate::tools::ToolSpec;
use rmcp::model::{Content, Tool};
use serde_json::Value;
use std::borrow::Cow;

/// Text handed back to the model for one tool result: the first item's text
/// when it is a text item, otherwise the whole content list as JSON.
pub fn extract_result_text(contents: &[Content]) -> String {
    if let Some(text) = contents.first().and_then(|item| item.raw.as_text()) {
        return text.text.clone();
    }
    serde_json::to_string(contents).unwrap_or_else(|_| "[]".to_string())
}

/// Model-facing descriptor for an MCP tool. Missing descriptions become empty.
pub fn tool_spec_from_rmcp(tool: &Tool) -> ToolSpec {
    ToolSpec {
        name: tool.name.clone().into_owned(),
        description: tool
            .description
            .clone()
            .map_or_else(String::new, Cow::into_owned),
        parameters: Value::Object(tool.input_schema.as_ref().clone()),
    }
}

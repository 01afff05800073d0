use crate::error::AnalysisError;
use crate::utils::text::truncate_with_ellipsis;
use serde_json::Value;

/// Characters of an unparsable answer kept in logs.
const RAW_LOG_CHARS: usize = 200;

/// Remove a Markdown code fence the model may wrap its JSON in.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw;

    let leading = text.trim_start();
    if let Some(rest) = leading.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }

    let trailing = text.trim_end();
    if let Some(rest) = trailing.strip_suffix("```") {
        text = rest.strip_suffix('\n').unwrap_or(rest);
    }

    text.trim()
}

/// Parse the model's final text into JSON. Any parse failure is terminal.
pub fn parse_answer(raw: &str) -> Result<Value, AnalysisError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|error| {
        tracing::error!(
            raw = %truncate_with_ellipsis(raw, RAW_LOG_CHARS),
            error = %error,
            "failed to parse model answer as JSON"
        );
        AnalysisError::InvalidOutput {
            reason: error.to_string(),
            raw: raw.to_string(),
        }
    })
}

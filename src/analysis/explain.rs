use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/recommendations`. Text fields take strings, numbers or
/// booleans (`"year": 1965`, `"title": 1984`); anything else reads as absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "lenient_titles")]
    pub seed_titles: Option<Vec<String>>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

/// Seed titles as a list; non-scalar entries are dropped.
fn lenient_titles<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(scalar_text).collect()),
        _ => None,
    })
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

impl ExplanationRequest {
    /// Literary blurb for one recommended item, or `None` when `title` or
    /// `mediaType` is missing.
    pub fn explanation(&self) -> Option<String> {
        present(self.media_type.as_deref())?;
        let title = present(self.title.as_deref())?;
        let byline = present(self.author.as_deref())
            .map(|author| format!(" by {author}"))
            .unwrap_or_default();

        Some(format!(
            "Like a thread connecting your shelf to the wider world\u{2014}{title}{byline} speaks to \
             the same preoccupations that run through the books you love: the weight of memory, \
             the pull of place, and the quiet insistence of character over plot. Worth meeting."
        ))
    }
}

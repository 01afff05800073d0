//! Lenient decoding of the model's JSON answer.
//!
//! Every decoder here is total: any JSON shape maps to a typed value, with
//! wrong or missing fields replaced by defaults.

use super::types::{AnalysisResult, MusicRecommendation, Recommendations, UNKNOWN_ARCHETYPE};
use crate::utils::text::non_blank;
use serde_json::{Map, Value};

pub fn normalize(value: &Value) -> AnalysisResult {
    let empty = Map::new();
    let root = value.as_object().unwrap_or(&empty);

    AnalysisResult {
        detected_books: string_list(root.get("detected_books")),
        dominant_themes: string_list(root.get("dominant_themes")),
        reader_archetype: root
            .get("reader_archetype")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ARCHETYPE)
            .to_string(),
        tone_profile: string_list(root.get("tone_profile")),
        recommendations: recommendations(root.get("recommendations")),
    }
}

/// Strings only; other items are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Trimmed, and absent when blank.
fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .and_then(non_blank)
        .map(ToString::to_string)
}

fn music_entry(value: &Value) -> Option<MusicRecommendation> {
    let entry = value.as_object()?;
    let label = entry.get("label").and_then(Value::as_str).and_then(non_blank)?;
    let url = entry
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| url.starts_with("https://"))
        .map(ToString::to_string);
    Some(MusicRecommendation {
        label: label.to_string(),
        url,
    })
}

fn music_list(value: Option<&Value>) -> Vec<MusicRecommendation> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(music_entry).collect())
        .unwrap_or_default()
}

fn recommendations(value: Option<&Value>) -> Recommendations {
    let Some(recs) = value.and_then(Value::as_object) else {
        return Recommendations::default();
    };

    Recommendations {
        books_intro: optional_text(recs.get("books_intro")),
        books: string_list(recs.get("books")),
        films_intro: optional_text(recs.get("films_intro")),
        films: string_list(recs.get("films")),
        music_intro: optional_text(recs.get("music_intro")),
        music: music_list(recs.get("music")),
        podcasts_intro: optional_text(recs.get("podcasts_intro")),
        podcasts: string_list(recs.get("podcasts")),
    }
}

use serde::{Deserialize, Serialize};

/// One music pick. `url` is a verified `https://` track link or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicRecommendation {
    /// "Artist - Album" as written by the model.
    pub label: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books_intro: Option<String>,
    #[serde(default)]
    pub books: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub films_intro: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_intro: Option<String>,
    #[serde(default)]
    pub music: Vec<MusicRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcasts_intro: Option<String>,
    #[serde(default)]
    pub podcasts: Vec<String>,
}

/// Cultural profile of a photographed shelf, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub detected_books: Vec<String>,
    pub dominant_themes: Vec<String>,
    pub reader_archetype: String,
    pub tone_profile: Vec<String>,
    pub recommendations: Recommendations,
}

pub const UNKNOWN_ARCHETYPE: &str = "Unknown";

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            detected_books: Vec::new(),
            dominant_themes: Vec::new(),
            reader_archetype: UNKNOWN_ARCHETYPE.to_string(),
            tone_profile: Vec::new(),
            recommendations: Recommendations::default(),
        }
    }
}

impl AnalysisResult {
    /// True when the model reported no readable books.
    pub fn is_empty_shelf(&self) -> bool {
        self.detected_books.is_empty()
    }
}

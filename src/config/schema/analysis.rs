use serde::{Deserialize, Serialize};

/// Upper bound on `max_rounds`, whatever the config file says.
pub const MAX_ROUNDS_HARD_CAP: u32 = 25;

fn default_max_rounds() -> u32 {
    20
}

fn default_model_call_timeout_secs() -> u64 {
    90
}

/// Orchestration loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum model calls per request.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Deadline for one model call. The tool side is bounded by
    /// `mcp.max_call_seconds`.
    #[serde(default = "default_model_call_timeout_secs")]
    pub model_call_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            model_call_timeout_secs: default_model_call_timeout_secs(),
        }
    }
}

impl AnalysisConfig {
    pub fn effective_max_rounds(&self) -> u32 {
        self.max_rounds.min(MAX_ROUNDS_HARD_CAP)
    }

    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_rounds == 0 {
            errors.push("analysis.max_rounds must be > 0".to_string());
        }
        if self.model_call_timeout_secs == 0 {
            errors.push("analysis.model_call_timeout_secs must be > 0".to_string());
        }
        errors
    }
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    3600
}

fn default_prune_threshold() -> usize {
    1000
}

/// Fixed-window limits for `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Expired entries are swept once the table grows past this size.
    #[serde(default = "default_prune_threshold")]
    pub prune_threshold: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            prune_threshold: default_prune_threshold(),
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_requests == 0 {
            errors.push("rate_limit.max_requests must be > 0".to_string());
        }
        if self.window_secs == 0 {
            errors.push("rate_limit.window_secs must be > 0".to_string());
        }
        errors
    }
}

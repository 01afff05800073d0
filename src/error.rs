use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for Afterword.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; adapters (provider HTTP, MCP transport,
/// config loading) keep using `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum AfterwordError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Tools ───────────────────────────────────────────────────────────
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // ── Analysis pipeline ───────────────────────────────────────────────
    #[error("analysis: {0}")]
    Analysis(#[from] AnalysisError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} credentials not configured")]
    MissingCredentials { provider: String },

    #[error("provider {provider} did not answer within {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },
}

// ─── Tool errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool provider connection failed: {0}")]
    Connection(String),

    #[error("tool {name} execution failed: {message}")]
    Execution { name: String, message: String },
}

// ─── Analysis errors ────────────────────────────────────────────────────────

/// Terminal outcomes of one shelf analysis that escape to the caller.
///
/// Per-tool failures never appear here: they are folded back into the
/// conversation as error tool results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The model produced no final text, including round-budget exhaustion.
    #[error("model produced no final answer after {rounds} round(s)")]
    EmptyAnswer { rounds: u32 },

    /// The final text was not parseable JSON after fence stripping.
    #[error("model answer is not valid JSON: {reason}")]
    InvalidOutput { reason: String, raw: String },

    /// The model call itself failed.
    #[error("model call failed: {0}")]
    Provider(#[source] anyhow::Error),

    /// The tool provider could not be started or listed.
    #[error("tool bridge failed: {0}")]
    ToolBridge(#[source] anyhow::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, AfterwordError>;

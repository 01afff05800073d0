pub mod schema;

pub use schema::{
    AnalysisConfig, Config, GatewayConfig, MAX_ROUNDS_HARD_CAP, McpConfig, ProviderConfig,
    RateLimitConfig,
};

mod analysis;
mod core;
mod gateway;
mod mcp;
mod provider;

pub use analysis::{AnalysisConfig, MAX_ROUNDS_HARD_CAP, RateLimitConfig};
pub use core::Config;
pub use gateway::GatewayConfig;
pub use mcp::McpConfig;
pub use provider::ProviderConfig;

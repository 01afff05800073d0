pub mod anthropic;
mod anthropic_types;
pub mod http_client;
pub mod response;
pub mod scrub;
pub mod traits;

pub use anthropic::AnthropicProvider;
pub use response::{
    ContentBlock, ImageSource, MessageRole, ProviderMessage, ProviderResponse, StopReason,
};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;

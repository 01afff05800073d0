pub mod traits;

pub use traits::{NoTools, ToolInvocation, ToolOutcome, ToolProvider, ToolProviderFactory, ToolSpec};

pub mod conversation;
pub mod tool_loop;
pub mod tool_types;

pub use conversation::Conversation;
pub use tool_loop::dispatch_round;
pub use tool_types::{LoopState, LoopStopReason, ToolCallRecord, ToolLoop, ToolLoopResult};

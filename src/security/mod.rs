pub mod rate_limit;

pub use rate_limit::{
    FixedWindowRateLimiter, InMemoryRateLimitStore, RateLimitDecision, RateLimitEntry,
    RateLimitStore,
};

//! Fixed-window request limiting keyed by client address.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Request count for one key within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

/// Backing table for [`FixedWindowRateLimiter`].
///
/// `update` must run the closure and store its result atomically with
/// respect to other calls for the same key.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitEntry>;

    fn set(&self, key: &str, entry: RateLimitEntry);

    /// Remove every entry whose window ended before `now`. Returns how many
    /// were dropped.
    fn prune(&self, now: Instant) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<RateLimitEntry>) -> RateLimitEntry,
    ) -> RateLimitEntry;
}

/// Process-local store. Entries live until pruned or the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.lock().get(key).copied()
    }

    fn set(&self, key: &str, entry: RateLimitEntry) {
        self.lock().insert(key.to_string(), entry);
    }

    fn prune(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at >= now);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<RateLimitEntry>) -> RateLimitEntry,
    ) -> RateLimitEntry {
        let mut entries = self.lock();
        let next = apply(entries.get(key).copied());
        entries.insert(key.to_string(), next);
        next
    }
}

/// Outcome of one [`FixedWindowRateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: Instant,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, rounded up.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let left = self.reset_at.saturating_duration_since(now);
        let secs = left.as_secs();
        if left.subsec_nanos() > 0 { secs + 1 } else { secs }
    }
}

/// Counts requests per key in fixed windows. Requests past the limit keep
/// incrementing the count until the window resets.
pub struct FixedWindowRateLimiter {
    store: Box<dyn RateLimitStore>,
    max_requests: u32,
    window: Duration,
    prune_threshold: usize,
}

impl FixedWindowRateLimiter {
    pub fn new(
        store: Box<dyn RateLimitStore>,
        max_requests: u32,
        window: Duration,
        prune_threshold: usize,
    ) -> Self {
        Self {
            store,
            max_requests,
            window,
            prune_threshold,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Box::new(InMemoryRateLimitStore::new()),
            config.max_requests,
            Duration::from_secs(config.window_secs),
            config.prune_threshold,
        )
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let window = self.window;
        let entry = self.store.update(key, &mut |current| match current {
            Some(entry) if now < entry.reset_at => RateLimitEntry {
                count: entry.count.saturating_add(1),
                reset_at: entry.reset_at,
            },
            _ => RateLimitEntry {
                count: 1,
                reset_at: now + window,
            },
        });

        if self.store.len() > self.prune_threshold {
            let pruned = self.store.prune(now);
            tracing::debug!(pruned, "pruned expired rate-limit entries");
        }

        RateLimitDecision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }

    #[cfg(test)]
    pub(crate) fn store_len(&self) -> usize {
        self.store.len()
    }
}

//! Rate limit counter storage.

use super::types::{FixedWindowState, RateLimitConfig, RateLimitDecision};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::time::Instant;

/// Trait for rate limit counter storage.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request against `key` and return the verdict.
    async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitDecision;

    /// Current window state for a key, if one is tracked.
    async fn state(&self, key: &str) -> Option<FixedWindowState>;
}

/// In-memory fixed-window store.
pub struct InMemoryRateLimitStore {
    states: DashMap<String, FixedWindowState>,
    last_sweep: Mutex<Instant>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Number of tracked client windows.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Drop windows that have fully elapsed.
    ///
    /// Runs at most once per cleanup interval. Concurrent callers skip
    /// instead of queueing behind the sweep lock.
    fn sweep(&self, now: Instant, config: &RateLimitConfig) {
        let Some(mut last) = self.last_sweep.try_lock() else {
            return;
        };
        if now.duration_since(*last) < config.cleanup_interval {
            return;
        }
        *last = now;

        let before = self.states.len();
        self.states
            .retain(|_, state| now.duration_since(state.window_start) <= config.window);

        let removed = before - self.states.len();
        if removed > 0 {
            tracing::debug!(
                removed,
                tracked = self.states.len(),
                "swept expired rate limit windows"
            );
        }
    }
}

impl Default for InMemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitDecision {
        let now = Instant::now();
        self.sweep(now, config);

        let mut entry = self
            .states
            .entry(key.to_string())
            .or_insert_with(|| FixedWindowState::empty(now));

        let state = entry.value_mut();
        let allowed = state.admit(now, config.max_requests, config.window);
        let resets_in = state.resets_in(now, config.window);

        RateLimitDecision {
            allowed,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(state.count),
            resets_in,
            retry_after: if allowed { None } else { Some(resets_in) },
        }
    }

    async fn state(&self, key: &str) -> Option<FixedWindowState> {
        self.states.get(key).map(|entry| entry.value().clone())
    }
}

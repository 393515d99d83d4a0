//! Rate limiting types.

use std::time::{Duration, Instant};

use crate::config::RateLimitSettings;

/// Rate limit configuration for one class of routes.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
    /// Minimum gap between housekeeping sweeps.
    pub cleanup_interval: Duration,
    /// Key prefix when several route classes share one store.
    pub class: Option<&'static str>,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            cleanup_interval: Duration::from_secs(60),
            class: None,
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self {
            max_requests: settings.max_requests,
            window: Duration::from_secs(settings.window_secs),
            cleanup_interval: Duration::from_secs(settings.cleanup_interval_secs),
            class: None,
        }
    }

    /// Preset for login and token endpoints.
    pub fn auth() -> Self {
        Self::new(5, 900).with_class("auth")
    }

    /// Preset for authenticated API routes.
    pub fn api() -> Self {
        Self::new(60, 60).with_class("api")
    }

    /// Preset for unauthenticated routes.
    pub fn public() -> Self {
        Self::new(100, 60).with_class("public")
    }

    /// Preset for upload endpoints.
    pub fn upload() -> Self {
        Self::new(10, 60).with_class("upload")
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Store key for a client, namespaced by class when set.
    pub fn scoped_key(&self, client: &str) -> String {
        match self.class {
            Some(class) => format!("{class}:{client}"),
            None => client.to_string(),
        }
    }
}

/// Per-key counter state.
///
/// A window opens on the first counted request and every request in
/// the next `window` seconds shares it. The counter resets only once
/// the window has fully elapsed, so a client that keeps hammering a
/// closed window stays rejected until it reopens.
#[derive(Debug, Clone)]
pub struct FixedWindowState {
    /// Requests counted in the current window.
    pub count: u32,
    /// When the current window opened.
    pub window_start: Instant,
}

impl FixedWindowState {
    /// Fresh state with nothing counted yet.
    pub fn empty(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    /// Count one request at `now`. Returns false when the window is
    /// already full; rejected requests are not counted.
    pub fn admit(&mut self, now: Instant, limit: u32, window: Duration) -> bool {
        if now.duration_since(self.window_start) > window {
            self.count = 0;
            self.window_start = now;
        }

        if self.count >= limit {
            return false;
        }

        self.count += 1;
        true
    }

    /// Time until the current window elapses.
    pub fn resets_in(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.duration_since(self.window_start))
    }
}

/// Verdict for a single request.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window elapses.
    pub resets_in: Duration,
    /// How long a rejected client should wait. `None` when allowed.
    pub retry_after: Option<Duration>,
}

impl RateLimitDecision {
    /// Retry-After in whole seconds, rounded up, never zero.
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after.map(|wait| {
            let mut secs = wait.as_secs();
            if wait.subsec_nanos() > 0 {
                secs += 1;
            }
            secs.max(1)
        })
    }
}

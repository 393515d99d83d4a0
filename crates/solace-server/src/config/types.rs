//! Access gate configuration types.

use serde::{Deserialize, Serialize};
use solace_access_types::{SubscriptionTier, TierCatalog, TierQuota};
use std::collections::HashMap;

/// Main access gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Token issue/verify configuration.
    pub auth: AuthConfig,
    /// Rate limiting configuration.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    /// Subscription tier overrides.
    #[serde(default)]
    pub tiers: TierSettings,
}

/// Token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Signing algorithm (HS256, HS384, or HS512).
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_ttl() -> u64 {
    30
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Enable rate limiting.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests admitted per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window size in seconds.
    #[serde(default = "default_window")]
    pub window_secs: u64,
    /// Minimum gap between housekeeping sweeps, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_window() -> u64 {
    60
}

fn default_cleanup_interval() -> u64 {
    60
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Subscription tier overrides.
///
/// Keys are tier names (`free`, `premium`, `religious`, `healthcare`,
/// `other`). Tiers not listed keep their built-in rank and quota.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierSettings {
    /// Authorization rank overrides.
    #[serde(default)]
    pub ranks: HashMap<String, u8>,
    /// Quota overrides.
    #[serde(default)]
    pub quotas: HashMap<String, TierQuota>,
}

impl TierSettings {
    /// The quota catalog with these overrides applied.
    ///
    /// Unparseable tier names are skipped here; validation has already
    /// rejected them.
    pub fn catalog(&self) -> TierCatalog {
        let mut catalog = TierCatalog::default();
        for (name, quota) in &self.quotas {
            if let Ok(tier) = name.parse::<SubscriptionTier>() {
                catalog.set(tier, *quota);
            }
        }
        catalog
    }
}

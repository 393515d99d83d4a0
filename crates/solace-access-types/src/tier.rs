//! Subscription tiers and their entitlements.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Subscription tier of a user account.
///
/// Deserializes leniently through [`Self::parse_lenient`], so identity
/// records with an unrecognized tier load as `Free` instead of failing.
/// Config and validation paths parse strictly via [`std::str::FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionTier {
    /// No paid subscription.
    Free,
    /// Individual paid plan.
    Premium,
    /// Plan for religious organizations.
    Religious,
    /// Plan for healthcare and hospice providers.
    Healthcare,
    /// Other organizational plans.
    Other,
}

impl SubscriptionTier {
    /// Authorization rank of this tier (higher = more access).
    ///
    /// Religious and Other rank equally; Healthcare ranks highest.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Premium => 1,
            Self::Religious => 2,
            Self::Healthcare => 3,
            Self::Other => 2,
        }
    }

    /// Parse a tier string, treating anything unrecognized as `Free`.
    ///
    /// Identity records can carry tier values written by older releases;
    /// an unknown tier must never grant more access than the lowest rank.
    pub fn parse_lenient(s: &str) -> Self {
        s.trim().to_lowercase().parse().unwrap_or(Self::Free)
    }
}

impl From<String> for SubscriptionTier {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl Default for SubscriptionTier {
    fn default() -> Self {
        Self::Free
    }
}

/// Resource quota granted by a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierQuota {
    /// Maximum number of active memorials.
    pub max_memorials: u32,
    /// Maximum total storage in megabytes.
    pub max_storage_mb: u32,
}

impl TierQuota {
    pub fn new(max_memorials: u32, max_storage_mb: u32) -> Self {
        Self {
            max_memorials,
            max_storage_mb,
        }
    }
}

/// Quota table for all subscription tiers.
///
/// Lookups for tiers without an entry fall back to the Free quota, so a
/// catalog missing a tier can only under-grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCatalog {
    quotas: HashMap<SubscriptionTier, TierQuota>,
}

impl TierCatalog {
    const FREE_QUOTA: TierQuota = TierQuota {
        max_memorials: 1,
        max_storage_mb: 100,
    };

    /// Get the quota for a tier.
    pub fn quota(&self, tier: SubscriptionTier) -> TierQuota {
        self.quotas.get(&tier).copied().unwrap_or(Self::FREE_QUOTA)
    }

    /// Replace the quota for a tier.
    pub fn set(&mut self, tier: SubscriptionTier, quota: TierQuota) {
        self.quotas.insert(tier, quota);
    }
}

impl Default for TierCatalog {
    fn default() -> Self {
        let mut quotas = HashMap::new();
        quotas.insert(SubscriptionTier::Free, TierQuota::new(1, 100));
        quotas.insert(SubscriptionTier::Premium, TierQuota::new(5, 1000));
        quotas.insert(SubscriptionTier::Religious, TierQuota::new(10, 2000));
        quotas.insert(SubscriptionTier::Healthcare, TierQuota::new(20, 5000));
        quotas.insert(SubscriptionTier::Other, TierQuota::new(10, 2000));
        Self { quotas }
    }
}

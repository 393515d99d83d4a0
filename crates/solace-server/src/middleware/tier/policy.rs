//! Tier authorization policy.

use crate::config::TierSettings;
use chrono::{DateTime, Utc};
use solace_access_types::{Identity, SubscriptionTier};
use std::collections::HashMap;
use thiserror::Error;

/// Why a tier check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierDenial {
    /// Caller's tier ranks below the requirement.
    #[error("tier {required} or higher required")]
    InsufficientTier {
        /// The tier the route demands.
        required: SubscriptionTier,
    },
    /// Tier ranks high enough but the subscription lapsed.
    #[error("subscription expired at {expired_at}")]
    SubscriptionExpired {
        /// When the subscription ran out.
        expired_at: DateTime<Utc>,
    },
}

/// Rank-based tier policy with optional per-deployment overrides.
#[derive(Debug, Clone, Default)]
pub struct TierPolicy {
    overrides: HashMap<SubscriptionTier, u8>,
}

impl TierPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one tier's rank.
    pub fn with_rank(mut self, tier: SubscriptionTier, rank: u8) -> Self {
        self.overrides.insert(tier, rank);
        self
    }

    /// Build from configuration. Unparseable tier names are skipped;
    /// config validation already rejects them before a policy is built.
    pub fn from_settings(settings: &TierSettings) -> Self {
        let mut policy = Self::new();
        for (name, rank) in &settings.ranks {
            if let Ok(tier) = name.parse::<SubscriptionTier>() {
                policy.overrides.insert(tier, *rank);
            }
        }
        policy
    }

    /// Effective rank for a tier.
    pub fn rank(&self, tier: SubscriptionTier) -> u8 {
        self.overrides.get(&tier).copied().unwrap_or(tier.rank())
    }

    /// Check `identity` against `required` at time `now`.
    ///
    /// A requirement ranking at zero admits everyone, lapsed or not.
    /// Rank is checked before expiry, so a caller failing both hears
    /// about the rank.
    pub fn authorize(
        &self,
        identity: &Identity,
        required: SubscriptionTier,
        now: DateTime<Utc>,
    ) -> Result<(), TierDenial> {
        if self.rank(required) == 0 {
            return Ok(());
        }

        if self.rank(identity.tier) < self.rank(required) {
            return Err(TierDenial::InsufficientTier { required });
        }

        match identity.tier_expires_at {
            Some(expired_at) if expired_at < now => {
                Err(TierDenial::SubscriptionExpired { expired_at })
            }
            _ => Ok(()),
        }
    }
}

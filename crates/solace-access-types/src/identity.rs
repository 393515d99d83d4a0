//! User identity snapshot consumed by the access gate.

use crate::{Role, SubscriptionTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_common_core::UserId;

/// The slice of a user record the access gate needs.
///
/// Owned by the identity service; the gate only reads it. A `None`
/// expiry means the subscription never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account identifier.
    pub id: UserId,
    /// Whether the account may authenticate at all.
    pub active: bool,
    /// Assigned role.
    pub role: Role,
    /// Current subscription tier.
    pub tier: SubscriptionTier,
    /// When the subscription lapses, if ever.
    pub tier_expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Create an active identity with the given role and tier.
    pub fn new(id: UserId, role: Role, tier: SubscriptionTier) -> Self {
        Self {
            id,
            active: true,
            role,
            tier,
            tier_expires_at: None,
        }
    }

    /// Set a subscription expiry.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.tier_expires_at = Some(expires_at);
        self
    }

    /// Mark the account inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check whether the subscription has lapsed as of `now`.
    pub fn tier_expired(&self, now: DateTime<Utc>) -> bool {
        match self.tier_expires_at {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }
}

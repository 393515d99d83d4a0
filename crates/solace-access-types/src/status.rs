//! Memorial access status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default reason stamped by [`AccessState::lock`].
pub const DEFAULT_LOCK_REASON: &str = "Subscription limit exceeded";
/// Default reason stamped by [`AccessState::set_grace_period`].
pub const DEFAULT_GRACE_REASON: &str = "Grace period - upgrade required";
/// Reason stamped by [`AccessState::archive`].
pub const ARCHIVED_REASON: &str = "Archived by user";

/// Access status of a memorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessStatus {
    /// Fully accessible.
    Active,
    /// Locked out of owner modification (over quota, downgrade).
    Locked,
    /// Temporarily restricted with a deadline to upgrade.
    GracePeriod,
    /// Retired by the owner.
    Archived,
}

impl Default for AccessStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Access status plus the stamp recording when and why it was restricted.
///
/// Transitions here are permissive record-level operations; policy such as
/// treating `Archived` as terminal lives with the caller. The stamp fields
/// always travel with the status: restricting sets both, `unlock` clears
/// both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    /// Current status.
    pub status: AccessStatus,
    /// When the current restriction was applied.
    pub locked_at: Option<DateTime<Utc>>,
    /// Why the current restriction was applied.
    pub locked_reason: Option<String>,
}

impl AccessState {
    /// Lock the memorial, stamping the time and reason.
    pub fn lock(&mut self, now: DateTime<Utc>, reason: Option<String>) {
        self.status = AccessStatus::Locked;
        self.locked_at = Some(now);
        self.locked_reason = Some(reason.unwrap_or_else(|| DEFAULT_LOCK_REASON.to_string()));
    }

    /// Return to `Active`, clearing the restriction stamp.
    pub fn unlock(&mut self) {
        self.status = AccessStatus::Active;
        self.locked_at = None;
        self.locked_reason = None;
    }

    /// Enter the grace period, stamping the time and reason.
    pub fn set_grace_period(&mut self, now: DateTime<Utc>, reason: Option<String>) {
        self.status = AccessStatus::GracePeriod;
        self.locked_at = Some(now);
        self.locked_reason = Some(reason.unwrap_or_else(|| DEFAULT_GRACE_REASON.to_string()));
    }

    /// Archive the memorial.
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.status = AccessStatus::Archived;
        self.locked_at = Some(now);
        self.locked_reason = Some(ARCHIVED_REASON.to_string());
    }

    /// True while under an owner-actionable restriction.
    ///
    /// `Archived` is deliberately not "locked": it is an end state, not a
    /// restriction the owner is expected to resolve.
    pub fn is_locked(&self) -> bool {
        matches!(self.status, AccessStatus::Locked | AccessStatus::GracePeriod)
    }

    /// True only while fully accessible.
    pub fn can_be_accessed(&self) -> bool {
        self.status == AccessStatus::Active
    }
}

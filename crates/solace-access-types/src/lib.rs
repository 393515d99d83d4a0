//! Identity, subscription tier, and memorial access types for Solace.

mod identity;
mod memorial;
mod role;
mod status;
mod tier;

pub use identity::Identity;
pub use memorial::{Memorial, MemorialPatch, ServicePreferences, Tribute};
pub use role::Role;
pub use status::{
    AccessState, AccessStatus, ARCHIVED_REASON, DEFAULT_GRACE_REASON, DEFAULT_LOCK_REASON,
};
pub use tier::{SubscriptionTier, TierCatalog, TierQuota};

//! Memorial lifecycle: status transitions and subscription downgrades.

pub mod downgrade;
pub mod service;

pub use downgrade::{
    plan_downgrade, DowngradePlan, DowngradeStrategy, StorageImpact, DOWNGRADE_GRACE_REASON,
    DOWNGRADE_LOCK_REASON,
};
pub use service::LifecycleService;

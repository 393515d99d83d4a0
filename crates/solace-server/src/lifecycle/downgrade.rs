//! Subscription downgrade planning and execution.
//!
//! A downgrade shrinks the owner's memorial quota. The plan keeps the
//! highest-priority accessible memorials up to the new limit and names
//! what happens to the rest; execution applies it through the lifecycle
//! transitions so the usual stamps and guards hold.

use super::service::LifecycleService;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use solace_access_types::{Identity, Memorial, SubscriptionTier, TierCatalog};
use solace_common_core::MemorialId;
use tracing::info;

/// Reason stamped on memorials locked by a soft downgrade.
pub const DOWNGRADE_LOCK_REASON: &str = "downgrade";
/// Reason stamped on memorials restricted by a grace downgrade.
pub const DOWNGRADE_GRACE_REASON: &str = "downgrade_grace";

/// What happens to over-quota memorials on downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DowngradeStrategy {
    /// Lock immediately; recoverable by upgrading.
    Soft,
    /// Delete permanently.
    Hard,
    /// Restrict with a grace period before locking.
    Grace,
}

/// Storage standing against the new tier's quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageImpact {
    /// Total storage the owner's memorials consume today.
    pub current_mb: u64,
    /// Storage allowance under the new tier.
    pub new_limit_mb: u32,
    /// Whether current usage overflows the new allowance.
    pub will_exceed: bool,
}

/// Which memorials survive a downgrade and which do not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DowngradePlan {
    /// Tier being downgraded to.
    pub new_tier: SubscriptionTier,
    /// How over-quota memorials are handled.
    pub strategy: DowngradeStrategy,
    /// Memorials that stay active, highest priority first.
    pub keep: Vec<MemorialId>,
    /// Memorials the strategy applies to.
    pub affected: Vec<MemorialId>,
    /// Storage standing under the new tier.
    pub storage: StorageImpact,
}

/// Compute a downgrade plan over the owner's memorials.
///
/// Only accessible memorials compete for the new quota; ones already
/// locked, in grace, or archived keep their status. Ordering is by
/// `priority_order` descending with ties broken by id, so planning the
/// same records twice yields the same plan. Storage counts every
/// memorial, restricted or not.
pub fn plan_downgrade(
    catalog: &TierCatalog,
    new_tier: SubscriptionTier,
    strategy: DowngradeStrategy,
    memorials: &[Memorial],
) -> DowngradePlan {
    let quota = catalog.quota(new_tier);

    let mut accessible: Vec<&Memorial> =
        memorials.iter().filter(|m| m.can_be_accessed()).collect();
    accessible.sort_by(|a, b| {
        b.priority_order
            .cmp(&a.priority_order)
            .then_with(|| a.id.cmp(&b.id))
    });

    let keep_count = (quota.max_memorials as usize).min(accessible.len());
    let keep = accessible[..keep_count].iter().map(|m| m.id).collect();
    let affected = accessible[keep_count..].iter().map(|m| m.id).collect();

    let current_mb: u64 = memorials.iter().map(|m| u64::from(m.storage_used_mb)).sum();

    DowngradePlan {
        new_tier,
        strategy,
        keep,
        affected,
        storage: StorageImpact {
            current_mb,
            new_limit_mb: quota.max_storage_mb,
            will_exceed: current_mb > u64::from(quota.max_storage_mb),
        },
    }
}

impl LifecycleService {
    /// Plan and execute a downgrade of `owner` to `new_tier`.
    ///
    /// Execution is per record: a store failure mid-way leaves earlier
    /// transitions in place, and re-running the downgrade is safe.
    pub async fn downgrade(
        &self,
        actor: &Identity,
        owner: &Identity,
        new_tier: SubscriptionTier,
        strategy: DowngradeStrategy,
        catalog: &TierCatalog,
    ) -> ApiResult<DowngradePlan> {
        if actor.id != owner.id && !actor.role.is_admin() {
            return Err(ApiError::Forbidden);
        }
        if owner.tier == new_tier {
            return Err(ApiError::StateConflict(
                "Downgrade target matches the current tier".to_string(),
            ));
        }

        let memorials = self.store().list_for_owner(owner.id).await?;
        let plan = plan_downgrade(catalog, new_tier, strategy, &memorials);

        for &id in &plan.affected {
            match strategy {
                DowngradeStrategy::Soft => {
                    self.lock(actor, id, Some(DOWNGRADE_LOCK_REASON.to_string()))
                        .await?;
                }
                DowngradeStrategy::Grace => {
                    self.set_grace_period(actor, id, Some(DOWNGRADE_GRACE_REASON.to_string()))
                        .await?;
                }
                DowngradeStrategy::Hard => {
                    self.store().delete(id).await?;
                }
            }
        }

        info!(
            owner = %owner.id,
            new_tier = %new_tier,
            strategy = ?strategy,
            kept = plan.keep.len(),
            affected = plan.affected.len(),
            "downgrade executed"
        );
        Ok(plan)
    }
}

//! Memorial lifecycle transitions.

use crate::error::{ApiError, ApiResult, ErrorContext};
use crate::store::MemorialStore;
use chrono::Utc;
use solace_access_types::{AccessStatus, Identity, Memorial, MemorialPatch};
use solace_common_core::MemorialId;
use std::sync::Arc;
use tracing::info;

/// Memorial lifecycle operations.
///
/// The record-level state machine is permissive; this service adds the
/// policy around it. Only the owner or an admin may act on a memorial,
/// and `Archived` is terminal: no command moves a memorial out of it.
pub struct LifecycleService {
    memorials: Arc<dyn MemorialStore>,
}

impl LifecycleService {
    pub fn new(memorials: Arc<dyn MemorialStore>) -> Self {
        Self { memorials }
    }

    /// Load a memorial for reading. Permitted in every access status.
    pub async fn fetch(&self, actor: &Identity, id: MemorialId) -> ApiResult<Memorial> {
        let memorial = self.memorials.load(id).await?.or_not_found("Memorial")?;

        if memorial.owner != actor.id && !actor.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(memorial)
    }

    /// Load a memorial for mutation. Rejects anything not `Active`
    /// with the stamped restriction reason.
    pub async fn check_memorial_access(
        &self,
        actor: &Identity,
        id: MemorialId,
    ) -> ApiResult<Memorial> {
        let memorial = self.fetch(actor, id).await?;

        if !memorial.can_be_accessed() {
            let reason = memorial
                .access
                .locked_reason
                .clone()
                .unwrap_or_else(|| "Memorial is not accessible".to_string());
            return Err(ApiError::ResourceLocked { reason });
        }

        Ok(memorial)
    }

    /// Lock a memorial out of owner modification.
    pub async fn lock(
        &self,
        actor: &Identity,
        id: MemorialId,
        reason: Option<String>,
    ) -> ApiResult<Memorial> {
        let mut memorial = self.fetch(actor, id).await?;
        ensure_not_archived(&memorial)?;

        let now = Utc::now();
        memorial.access.lock(now, reason);
        memorial.updated_at = now;
        self.memorials.update(&memorial).await?;

        info!(
            memorial_id = %memorial.id,
            reason = memorial.access.locked_reason.as_deref().unwrap_or(""),
            "memorial locked"
        );
        Ok(memorial)
    }

    /// Return a restricted memorial to `Active`, clearing the stamp.
    pub async fn unlock(&self, actor: &Identity, id: MemorialId) -> ApiResult<Memorial> {
        let mut memorial = self.fetch(actor, id).await?;
        ensure_not_archived(&memorial)?;

        memorial.access.unlock();
        memorial.updated_at = Utc::now();
        self.memorials.update(&memorial).await?;

        info!(memorial_id = %memorial.id, "memorial unlocked");
        Ok(memorial)
    }

    /// Put a memorial into its grace period.
    pub async fn set_grace_period(
        &self,
        actor: &Identity,
        id: MemorialId,
        reason: Option<String>,
    ) -> ApiResult<Memorial> {
        let mut memorial = self.fetch(actor, id).await?;
        ensure_not_archived(&memorial)?;

        let now = Utc::now();
        memorial.access.set_grace_period(now, reason);
        memorial.updated_at = now;
        self.memorials.update(&memorial).await?;

        info!(
            memorial_id = %memorial.id,
            reason = memorial.access.locked_reason.as_deref().unwrap_or(""),
            "memorial entered grace period"
        );
        Ok(memorial)
    }

    /// Archive a memorial. Terminal; repeated archives are conflicts.
    pub async fn archive(&self, actor: &Identity, id: MemorialId) -> ApiResult<Memorial> {
        let mut memorial = self.fetch(actor, id).await?;
        ensure_not_archived(&memorial)?;

        let now = Utc::now();
        memorial.access.archive(now);
        memorial.updated_at = now;
        self.memorials.update(&memorial).await?;

        info!(memorial_id = %memorial.id, "memorial archived");
        Ok(memorial)
    }

    /// Apply a partial content update to an accessible memorial.
    pub async fn update(
        &self,
        actor: &Identity,
        id: MemorialId,
        patch: MemorialPatch,
    ) -> ApiResult<Memorial> {
        let mut memorial = self.check_memorial_access(actor, id).await?;

        patch.apply(&mut memorial, Utc::now());
        self.memorials.update(&memorial).await?;
        Ok(memorial)
    }

    pub(crate) fn store(&self) -> &Arc<dyn MemorialStore> {
        &self.memorials
    }
}

fn ensure_not_archived(memorial: &Memorial) -> ApiResult<()> {
    if memorial.access.status == AccessStatus::Archived {
        return Err(ApiError::StateConflict(
            "Archived memorials cannot change status".to_string(),
        ));
    }
    Ok(())
}

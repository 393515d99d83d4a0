//! Store traits the access gate depends on.
//!
//! Persistence belongs to the surrounding services; the gate only needs
//! these two seams. `Ok(None)` means the record does not exist, `Err`
//! means the lookup itself failed. Callers must keep those outcomes
//! distinct: one is an auth decision, the other is an outage.

pub mod memory;

use async_trait::async_trait;
use solace_access_types::{Identity, Memorial};
use solace_common_core::{MemorialId, UserId};
use thiserror::Error;

pub use memory::{MemoryIdentityStore, MemoryMemorialStore};

/// Store-side failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded.
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Read access to user identity records.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Load the identity for a user, if it exists.
    async fn load(&self, id: UserId) -> Result<Option<Identity>, StoreError>;
}

/// Access to memorial records.
#[async_trait]
pub trait MemorialStore: Send + Sync {
    /// Load a memorial, if it exists.
    async fn load(&self, id: MemorialId) -> Result<Option<Memorial>, StoreError>;

    /// Persist the full current state of a memorial.
    ///
    /// Status, stamp, and content fields are written together; partial
    /// writes would let a status land without its reason.
    async fn update(&self, memorial: &Memorial) -> Result<(), StoreError>;

    /// Remove a memorial permanently.
    async fn delete(&self, id: MemorialId) -> Result<(), StoreError>;

    /// List every memorial owned by a user.
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Memorial>, StoreError>;
}

//! Memorial records and partial updates.

use crate::AccessState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_common_core::{MemorialId, UserId};

/// A tribute left on a memorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tribute {
    /// Display name of the contributor.
    pub author: String,
    /// The tribute text.
    pub message: String,
    /// When the tribute was added.
    pub added_at: DateTime<Utc>,
}

impl Tribute {
    pub fn new(author: impl Into<String>, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            added_at: now,
        }
    }
}

/// Planned service preferences for a memorial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePreferences {
    /// Preferred venue, if chosen.
    pub venue: Option<String>,
    /// Music selections.
    #[serde(default)]
    pub music: Vec<String>,
    /// Readings and eulogies.
    #[serde(default)]
    pub readings: Vec<String>,
    /// Free-form planning notes.
    pub notes: Option<String>,
}

/// A memorial owned by a user account.
///
/// The access gate reads `owner` and `access`; everything else belongs to
/// the planning features. `priority_order` decides which memorials stay
/// active when a downgrade shrinks the owner's quota (higher = kept
/// first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memorial {
    /// Memorial identifier.
    pub id: MemorialId,
    /// Owning account.
    pub owner: UserId,
    /// Name of the person remembered.
    pub name: String,
    /// Optional biography or description.
    pub description: Option<String>,
    /// Access status and restriction stamp.
    #[serde(default)]
    pub access: AccessState,
    /// Keep-ordering under quota downgrades.
    #[serde(default)]
    pub priority_order: i32,
    /// Storage consumed by photos and media, in megabytes.
    #[serde(default)]
    pub storage_used_mb: u32,
    /// Tributes left by visitors.
    #[serde(default)]
    pub tributes: Vec<Tribute>,
    /// Service planning preferences.
    #[serde(default)]
    pub service_prefs: ServicePreferences,
    /// When the memorial was created.
    pub created_at: DateTime<Utc>,
    /// When the memorial was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Memorial {
    /// Create a new active memorial.
    pub fn new(owner: UserId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: MemorialId::new(),
            owner,
            name: name.into(),
            description: None,
            access: AccessState::default(),
            priority_order: 0,
            storage_used_mb: 0,
            tributes: Vec::new(),
            service_prefs: ServicePreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the keep-ordering priority.
    pub fn with_priority(mut self, priority_order: i32) -> Self {
        self.priority_order = priority_order;
        self
    }

    /// Set the consumed storage.
    pub fn with_storage_used(mut self, storage_used_mb: u32) -> Self {
        self.storage_used_mb = storage_used_mb;
        self
    }

    /// True while under an owner-actionable restriction.
    pub fn is_locked(&self) -> bool {
        self.access.is_locked()
    }

    /// True only while fully accessible.
    pub fn can_be_accessed(&self) -> bool {
        self.access.can_be_accessed()
    }
}

/// Partial update to a memorial.
///
/// Every field is optional; `apply` writes only the fields that are
/// present and refreshes `updated_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemorialPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority_order: Option<i32>,
    pub tributes: Option<Vec<Tribute>>,
    pub service_prefs: Option<ServicePreferences>,
}

impl MemorialPatch {
    /// Apply this patch to a memorial.
    pub fn apply(self, memorial: &mut Memorial, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            memorial.name = name;
        }
        if let Some(description) = self.description {
            memorial.description = Some(description);
        }
        if let Some(priority_order) = self.priority_order {
            memorial.priority_order = priority_order;
        }
        if let Some(tributes) = self.tributes {
            memorial.tributes = tributes;
        }
        if let Some(service_prefs) = self.service_prefs {
            memorial.service_prefs = service_prefs;
        }
        memorial.updated_at = now;
    }
}

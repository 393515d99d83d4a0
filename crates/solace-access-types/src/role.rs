//! User roles.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular account holder.
    User,
    /// Platform administrator.
    Admin,
    /// Administrator with full system access.
    SuperAdmin,
}

impl Role {
    /// Numeric value for comparison (higher = more privileged).
    pub fn level(&self) -> u8 {
        match self {
            Self::User => 0,
            Self::Admin => 1,
            Self::SuperAdmin => 2,
        }
    }

    /// Check if this role meets a minimum requirement.
    pub fn at_least(&self, required: Self) -> bool {
        self.level() >= required.level()
    }

    /// Check if this role grants admin privileges.
    pub fn is_admin(&self) -> bool {
        self.at_least(Self::Admin)
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

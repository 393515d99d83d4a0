//! JWT claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use solace_common_core::UserId;

/// JWT claims structure.
///
/// Immutable once issued; re-issuing is the only way to extend a
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, expiring `ttl` after `issued_at`.
    pub fn new(subject: UserId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Get the subject as a typed user ID.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

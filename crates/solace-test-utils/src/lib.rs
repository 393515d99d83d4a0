//! Test fixtures for Solace crates.

use chrono::{DateTime, Duration, Utc};
use solace_access_types::{Identity, Memorial, Role, SubscriptionTier};
use solace_common_core::UserId;

/// An active free-tier user.
pub fn free_user() -> Identity {
    Identity::new(UserId::new(), Role::User, SubscriptionTier::Free)
}

/// An active user on `tier` with no subscription expiry.
pub fn user_on(tier: SubscriptionTier) -> Identity {
    Identity::new(UserId::new(), Role::User, tier)
}

/// A premium user whose subscription is valid for another 30 days.
pub fn premium_user(now: DateTime<Utc>) -> Identity {
    user_on(SubscriptionTier::Premium).with_expiry(now + Duration::days(30))
}

/// A premium user whose subscription lapsed three days ago.
pub fn lapsed_premium_user(now: DateTime<Utc>) -> Identity {
    user_on(SubscriptionTier::Premium).with_expiry(now - Duration::days(3))
}

/// An admin account.
pub fn admin_user() -> Identity {
    Identity::new(UserId::new(), Role::Admin, SubscriptionTier::Free)
}

/// A memorial owned by `owner` with the given keep-priority.
pub fn memorial_for(owner: UserId, priority: i32) -> Memorial {
    Memorial::new(owner, "Test Memorial", Utc::now()).with_priority(priority)
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(_) => {}
        }
    };
}

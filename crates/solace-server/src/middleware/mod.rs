//! Middleware for the Solace access gate.

pub mod auth;
pub mod rate_limit;
pub mod tier;

pub use auth::{
    AdminOnly, AuthLayer, AuthService, Claims, CurrentIdentity, MaybeIdentity, SuperAdminOnly,
    TokenCodec, TokenError,
};
pub use rate_limit::{
    FixedWindowState, InMemoryRateLimitStore, RateLimitConfig, RateLimitDecision, RateLimitLayer,
    RateLimitService, RateLimitStore,
};
pub use tier::{TierDenial, TierLayer, TierPolicy, TierService};

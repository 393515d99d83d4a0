//! Fixed-window rate limiting.
//!
//! Each client gets a counter keyed by IP and user agent. The first
//! request opens a window; once the counter reaches the limit, further
//! requests are rejected with 429 until the window elapses. Rejected
//! requests are never counted, so a saturated client's window is not
//! pushed forward by its own retries.

pub mod layer;
pub mod store;
pub mod types;

pub use layer::{RateLimitLayer, RateLimitService};
pub use store::{InMemoryRateLimitStore, RateLimitStore};
pub use types::{FixedWindowState, RateLimitConfig, RateLimitDecision};

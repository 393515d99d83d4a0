//! Subscription tier authorization.

pub mod layer;
pub mod policy;

pub use layer::{TierLayer, TierService};
pub use policy::{TierDenial, TierPolicy};

//! Authentication middleware for the Solace access gate.

pub mod claims;
pub mod codec;
pub mod extractor;
pub mod layer;

pub use claims::Claims;
pub use codec::{TokenCodec, TokenError};
pub use extractor::{AdminOnly, CurrentIdentity, MaybeIdentity, SuperAdminOnly};
pub use layer::{AuthLayer, AuthService};

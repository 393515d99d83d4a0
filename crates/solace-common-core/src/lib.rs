//! Shared identifier types for Solace crates.

pub mod id;

pub use id::{IdParseError, MemorialId, UserId};

//! Error handling for the Solace access gate.

pub mod context;
pub mod response;
pub mod types;

pub use context::ErrorContext;
pub use types::{ApiError, ApiResult};

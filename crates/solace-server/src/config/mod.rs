//! Access gate configuration module.

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{load_config, ConfigLoader};
pub use types::{AccessConfig, AuthConfig, RateLimitSettings, TierSettings};
pub use validation::{validate_config, ConfigError};

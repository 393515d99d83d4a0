//! Configuration validation.

use super::types::AccessConfig;
use thiserror::Error;

const ALLOWED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JWT secret: must be at least 32 characters")]
    InvalidJwtSecret,

    #[error("Invalid JWT algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Invalid token TTL: must be greater than zero")]
    InvalidTokenTtl,

    #[error("Invalid rate limit configuration")]
    InvalidRateLimit,

    #[error("Invalid rate limit window: must be greater than zero")]
    InvalidRateWindow,

    #[error("Unknown subscription tier in overrides: {0}")]
    UnknownTier(String),
}

/// Validate access gate configuration.
pub fn validate_config(config: &AccessConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate JWT secret
    if config.auth.jwt_secret.len() < 32 {
        errors.push(ConfigError::InvalidJwtSecret);
    }

    // Validate algorithm
    if !ALLOWED_ALGORITHMS.contains(&config.auth.algorithm.as_str()) {
        errors.push(ConfigError::InvalidAlgorithm(config.auth.algorithm.clone()));
    }

    // Validate token TTL
    if config.auth.token_ttl_minutes == 0 {
        errors.push(ConfigError::InvalidTokenTtl);
    }

    // Validate rate limit
    if config.rate_limit.enabled && config.rate_limit.max_requests == 0 {
        errors.push(ConfigError::InvalidRateLimit);
    }
    if config.rate_limit.enabled && config.rate_limit.window_secs == 0 {
        errors.push(ConfigError::InvalidRateWindow);
    }

    // Validate tier override keys
    for key in config.tiers.ranks.keys().chain(config.tiers.quotas.keys()) {
        if key.parse::<solace_access_types::SubscriptionTier>().is_err() {
            errors.push(ConfigError::UnknownTier(key.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    #[test]
    fn test_invalid_jwt_secret() {
        let mut config = test_config();
        config.auth.jwt_secret = "short".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidJwtSecret)));
    }

    #[test]
    fn test_invalid_algorithm() {
        let mut config = test_config();
        config.auth.algorithm = "RS256".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidAlgorithm(_))));
    }

    #[test]
    fn test_invalid_token_ttl() {
        let mut config = test_config();
        config.auth.token_ttl_minutes = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidTokenTtl)));
    }

    #[test]
    fn test_invalid_rate_limit() {
        let mut config = test_config();
        config.rate_limit.enabled = true;
        config.rate_limit.max_requests = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidRateLimit)));
    }

    #[test]
    fn test_disabled_rate_limit_skips_checks() {
        let mut config = test_config();
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 0;
        config.rate_limit.window_secs = 0;

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_tier_override() {
        let mut config = test_config();
        config.tiers.ranks.insert("platinum".to_string(), 4);

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownTier(t) if t == "platinum")));
    }

    #[test]
    fn test_valid_config() {
        let config = test_config();
        assert!(validate_config(&config).is_ok());
    }

    fn test_config() -> AccessConfig {
        AccessConfig {
            auth: AuthConfig {
                jwt_secret: "a".repeat(32),
                algorithm: "HS256".to_string(),
                token_ttl_minutes: 30,
            },
            rate_limit: RateLimitSettings::default(),
            tiers: TierSettings::default(),
        }
    }
}

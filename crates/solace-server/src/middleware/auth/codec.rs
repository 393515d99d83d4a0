//! Token issue and verification.

use super::claims::Claims;
use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use solace_common_core::UserId;
use thiserror::Error;

/// Why a token failed verification.
///
/// Checks run in a fixed order, so a token that is both tampered and
/// expired reports the signature failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is not parseable as a JWT.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the signing secret.
    #[error("token signature is invalid")]
    BadSignature,
    /// The token was valid but its lifetime has passed.
    #[error("token has expired")]
    Expired,
}

/// Issues and verifies bearer tokens.
///
/// Verification is pure: the decision depends only on the token bytes
/// and the clock. Expiry is exact; clock skew between issuer and
/// verifier is not compensated (known limitation, see `leeway`).
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec with the given secret, algorithm, and token TTL.
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        let mut validation = Validation::new(algorithm);
        // The library default tolerates 60s of skew; expiry here is exact.
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            ttl,
        }
    }

    /// Create a codec from validated configuration.
    pub fn from_config(config: &AuthConfig) -> ApiResult<Self> {
        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!(
                "unsupported JWT algorithm: {}",
                config.algorithm
            )))?;

        Ok(Self::new(
            &config.jwt_secret,
            algorithm,
            Duration::minutes(config.token_ttl_minutes as i64),
        ))
    }

    /// Issue a token for a subject, valid from now.
    pub fn issue(&self, subject: UserId) -> ApiResult<String> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for a subject with an explicit issue time.
    pub fn issue_at(&self, subject: UserId, issued_at: DateTime<Utc>) -> ApiResult<String> {
        let claims = Claims::new(subject, issued_at, self.ttl);
        encode(&self.header, &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(anyhow::Error::from(e).context("token signing failed")))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(
            "test_secret_key_32_chars_long!!!",
            Algorithm::HS256,
            Duration::minutes(30),
        )
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = codec();
        let subject = UserId::new();

        let token = codec.issue(subject).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.user_id(), Some(subject));
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let token = codec
            .issue_at(UserId::new(), Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec();
        assert_eq!(codec.verify("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let codec = codec();
        let other = TokenCodec::new(
            "another_secret_key_32_chars_long",
            Algorithm::HS256,
            Duration::minutes(30),
        );

        let token = other.issue(UserId::new()).unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_and_expired_reports_signature() {
        // Signature verification runs before expiry validation, so a
        // forged token never leaks whether it would also be expired.
        let codec = codec();
        let other = TokenCodec::new(
            "another_secret_key_32_chars_long",
            Algorithm::HS256,
            Duration::minutes(30),
        );

        let token = other
            .issue_at(UserId::new(), Utc::now() - Duration::hours(2))
            .unwrap();
        assert_eq!(codec.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_from_config() {
        let codec = TokenCodec::from_config(&AuthConfig {
            jwt_secret: "test_secret_key_32_chars_long!!!".to_string(),
            algorithm: "HS512".to_string(),
            token_ttl_minutes: 15,
        })
        .unwrap();

        assert_eq!(codec.ttl(), Duration::minutes(15));

        let token = codec.issue(UserId::new()).unwrap();
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn test_from_config_rejects_unknown_algorithm() {
        let result = TokenCodec::from_config(&AuthConfig {
            jwt_secret: "test_secret_key_32_chars_long!!!".to_string(),
            algorithm: "none".to_string(),
            token_ttl_minutes: 30,
        });
        assert!(result.is_err());
    }
}

//! API error types.

use crate::middleware::auth::TokenError;
use crate::middleware::tier::TierDenial;
use crate::store::StoreError;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use solace_access_types::SubscriptionTier;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
///
/// Every variant is an expected control-flow branch; none of them are
/// panics. Only `RateLimited` (after the advertised delay) and
/// `TokenExpired` (after a refresh) are retryable as-is by the client;
/// `LookupFailed` is retryable because the fault is on our side.
#[derive(Debug, Error)]
pub enum ApiError {
    // 401 Unauthorized
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Authentication token expired")]
    TokenExpired,

    #[error("User not found")]
    UserNotFound,

    // 403 Forbidden
    #[error("User account is deactivated")]
    UserInactive,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Subscription tier {required} or higher required")]
    TierRequired { required: SubscriptionTier },

    #[error("Active subscription required")]
    SubscriptionExpired { expired_at: DateTime<Utc> },

    #[error("Memorial is locked: {reason}")]
    ResourceLocked { reason: String },

    // 404 Not Found
    #[error("{0} not found")]
    NotFound(String),

    // 409 Conflict
    #[error("State conflict: {0}")]
    StateConflict(String),

    // 429 Too Many Requests
    #[error("Rate limit exceeded")]
    RateLimited {
        retry_after: u64,
        limit: u32,
        window: u64,
    },

    // 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // 503 Service Unavailable
    #[error("Service temporarily unavailable")]
    LookupFailed(String),
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::UserNotFound => StatusCode::UNAUTHORIZED,

            Self::UserInactive
            | Self::Forbidden
            | Self::TierRequired { .. }
            | Self::SubscriptionExpired { .. }
            | Self::ResourceLocked { .. } => StatusCode::FORBIDDEN,

            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::StateConflict(_) => StatusCode::CONFLICT,

            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Self::LookupFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserInactive => "USER_INACTIVE",
            Self::Forbidden => "FORBIDDEN",
            Self::TierRequired { .. } => "TIER_REQUIRED",
            Self::SubscriptionExpired { .. } => "SUBSCRIPTION_EXPIRED",
            Self::ResourceLocked { .. } => "RESOURCE_LOCKED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::StateConflict(_) => "STATE_CONFLICT",
            Self::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::LookupFailed(_) => "LOOKUP_FAILED",
        }
    }

    /// Check if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Malformed | TokenError::BadSignature => ApiError::InvalidToken,
        }
    }
}

impl From<TierDenial> for ApiError {
    fn from(err: TierDenial) -> Self {
        match err {
            TierDenial::InsufficientTier { required } => ApiError::TierRequired { required },
            TierDenial::SubscriptionExpired { expired_at } => {
                ApiError::SubscriptionExpired { expired_at }
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::LookupFailed(err.to_string())
    }
}

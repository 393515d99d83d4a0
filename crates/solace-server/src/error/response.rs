//! Rejection envelope implementation.

use super::types::ApiError;
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Wire-format rejection payload.
///
/// Top-level camelCase keys; `retryAfter`, `limit`, and `window` appear
/// only on rate-limit rejections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Rejection {
    success: bool,
    error_code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    window: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            match &self {
                ApiError::LookupFailed(detail) => error!(
                    code = self.error_code(),
                    detail = %detail,
                    "Dependency lookup failed"
                ),
                _ => error!(
                    error = %self,
                    code = self.error_code(),
                    "Server error occurred"
                ),
            }
        } else if !matches!(self, ApiError::NotFound(_)) {
            warn!(
                error = %self,
                code = self.error_code(),
                "Request denied"
            );
        }

        let status = self.status_code();
        let code = self.error_code();

        let (message, details) = match &self {
            ApiError::TierRequired { required } => (
                self.to_string(),
                Some(serde_json::json!({ "requiredTier": required })),
            ),
            ApiError::SubscriptionExpired { expired_at } => (
                self.to_string(),
                Some(serde_json::json!({ "expiredAt": expired_at })),
            ),
            ApiError::ResourceLocked { reason } => (
                self.to_string(),
                Some(serde_json::json!({ "reason": reason })),
            ),
            ApiError::Internal(err) => {
                // Don't expose internal error details in production
                let message = if cfg!(debug_assertions) {
                    format!("{}: {}", self, err)
                } else {
                    "An internal error occurred".to_string()
                };
                (message, None)
            }
            _ => (self.to_string(), None),
        };

        let (retry_after, limit, window) = match self {
            ApiError::RateLimited {
                retry_after,
                limit,
                window,
            } => (Some(retry_after), Some(limit), Some(window)),
            _ => (None, None, None),
        };

        let body = Rejection {
            success: false,
            error_code: code,
            message,
            details,
            retry_after,
            limit,
            window,
        };

        let mut response = (status, Json(body)).into_response();

        // Add retry-after header for rate limiting
        if let Some(retry_after) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }

        response
    }
}

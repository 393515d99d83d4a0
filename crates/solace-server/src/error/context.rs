//! Error context utilities.

use super::types::ApiError;

/// Extension trait for turning absent values into API errors.
pub trait ErrorContext<T> {
    /// Convert an absent value into a not-found error.
    fn or_not_found(self, resource: impl Into<String>) -> Result<T, ApiError>;

    /// Convert an absent value into a forbidden error.
    fn or_forbidden(self) -> Result<T, ApiError>;
}

impl<T> ErrorContext<T> for Option<T> {
    fn or_not_found(self, resource: impl Into<String>) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::NotFound(resource.into()))
    }

    fn or_forbidden(self) -> Result<T, ApiError> {
        self.ok_or(ApiError::Forbidden)
    }
}

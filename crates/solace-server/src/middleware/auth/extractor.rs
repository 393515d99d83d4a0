//! Handler-side extractors for the authenticated identity.
//!
//! [`super::layer::AuthLayer`] stores the verified [`Identity`] in
//! request extensions; these extractors pull it back out with the
//! right rejection when it is absent.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use solace_access_types::{Identity, Role};

use crate::error::ApiError;

/// Extracts the authenticated identity, rejecting with 401 when the
/// request never passed the auth layer.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Extracts the identity when present, `None` on anonymous requests.
///
/// For routes mounted outside the auth layer that still want to
/// personalize responses for signed-in callers.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}

/// Extracts the identity and requires an admin or super admin role.
#[derive(Debug, Clone)]
pub struct AdminOnly(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) =
            CurrentIdentity::from_request_parts(parts, state).await?;

        if !identity.role.is_admin() {
            return Err(ApiError::Forbidden);
        }

        Ok(AdminOnly(identity))
    }
}

/// Extracts the identity and requires the super admin role.
#[derive(Debug, Clone)]
pub struct SuperAdminOnly(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for SuperAdminOnly
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(identity) =
            CurrentIdentity::from_request_parts(parts, state).await?;

        if !identity.role.at_least(Role::SuperAdmin) {
            return Err(ApiError::Forbidden);
        }

        Ok(SuperAdminOnly(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use solace_access_types::SubscriptionTier;
    use solace_common_core::UserId;

    fn identity_with_role(role: Role) -> Identity {
        Identity::new(UserId::new(), role, SubscriptionTier::Free)
    }

    fn parts_with(identity: Option<Identity>) -> Parts {
        let mut req = Request::new(());
        if let Some(identity) = identity {
            req.extensions_mut().insert(identity);
        }
        let (parts, ()) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_current_identity_present() {
        let mut parts = parts_with(Some(identity_with_role(Role::User)));
        let extracted = CurrentIdentity::from_request_parts(&mut parts, &()).await;
        assert!(extracted.is_ok());
    }

    #[tokio::test]
    async fn test_current_identity_missing() {
        let mut parts = parts_with(None);
        let extracted = CurrentIdentity::from_request_parts(&mut parts, &()).await;
        assert!(matches!(extracted, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_maybe_identity_is_infallible() {
        let mut parts = parts_with(None);
        let MaybeIdentity(found) = MaybeIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_admin_only_rejects_user() {
        let mut parts = parts_with(Some(identity_with_role(Role::User)));
        let extracted = AdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(extracted, Err(ApiError::Forbidden)));
    }

    #[tokio::test]
    async fn test_admin_only_accepts_admin() {
        let mut parts = parts_with(Some(identity_with_role(Role::Admin)));
        assert!(AdminOnly::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_super_admin_only_rejects_admin() {
        let mut parts = parts_with(Some(identity_with_role(Role::Admin)));
        let extracted = SuperAdminOnly::from_request_parts(&mut parts, &()).await;
        assert!(matches!(extracted, Err(ApiError::Forbidden)));

        let mut parts = parts_with(Some(identity_with_role(Role::SuperAdmin)));
        assert!(SuperAdminOnly::from_request_parts(&mut parts, &())
            .await
            .is_ok());
    }
}

//! Tier requirement middleware layer.
//!
//! Mounted per route subtree, inside the auth layer, so the identity
//! is already in request extensions by the time this runs.

use super::policy::TierPolicy;
use crate::error::ApiError;
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures::future::BoxFuture;
use solace_access_types::{Identity, SubscriptionTier};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::warn;

/// Tier requirement layer.
#[derive(Clone)]
pub struct TierLayer {
    policy: Arc<TierPolicy>,
    required: SubscriptionTier,
}

impl TierLayer {
    pub fn new(policy: Arc<TierPolicy>, required: SubscriptionTier) -> Self {
        Self { policy, required }
    }
}

impl<S> Layer<S> for TierLayer {
    type Service = TierService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TierService {
            inner,
            policy: self.policy.clone(),
            required: self.required,
        }
    }
}

/// Tier requirement middleware service.
#[derive(Clone)]
pub struct TierService<S> {
    inner: S,
    policy: Arc<TierPolicy>,
    required: SubscriptionTier,
}

impl<S> Service<Request> for TierService<S>
where
    S: Service<Request, Response = Response, Error = std::convert::Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = std::convert::Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let policy = self.policy.clone();
        let required = self.required;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(identity) = req.extensions().get::<Identity>() else {
                warn!("Tier check without authentication");
                return Ok(ApiError::Unauthorized.into_response());
            };

            if let Err(denial) = policy.authorize(identity, required, Utc::now()) {
                warn!(
                    user_id = %identity.id,
                    tier = %identity.tier,
                    required = %required,
                    "Tier requirement not met"
                );
                return Ok(ApiError::from(denial).into_response());
            }

            inner.call(req).await
        })
    }
}

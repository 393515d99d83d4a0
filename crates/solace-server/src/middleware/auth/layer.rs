//! Authentication middleware layer.
//!
//! Verifies the bearer token, loads the caller's identity, and stashes
//! it in request extensions for extractors and inner layers. Runs after
//! rate limiting: an over-limit client is turned away before any
//! signature work happens.

use super::codec::TokenCodec;
use crate::error::ApiError;
use crate::store::IdentityStore;
use axum::{
    body::Body,
    extract::Request,
    http::header,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Authentication layer configuration.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
}

impl AuthLayer {
    /// Create new auth layer.
    pub fn new(codec: Arc<TokenCodec>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { codec, identities }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            codec: self.codec.clone(),
            identities: self.identities.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
}

impl<S> Service<Request> for AuthService<S>
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

    fn call(&mut self, mut req: Request) -> Self::Future {
        let codec = self.codec.clone();
        let identities = self.identities.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = match extract_bearer(&req) {
                Ok(token) => token,
                Err(err) => return Ok(err.into_response()),
            };

            let claims = match codec.verify(&token) {
                Ok(claims) => claims,
                Err(err) => return Ok(ApiError::from(err).into_response()),
            };

            // A subject we cannot type as a user ID was not minted for
            // this gate.
            let user_id = match claims.user_id() {
                Some(user_id) => user_id,
                None => return Ok(ApiError::InvalidToken.into_response()),
            };

            let identity = match identities.load(user_id).await {
                Ok(Some(identity)) => identity,
                Ok(None) => return Ok(ApiError::UserNotFound.into_response()),
                Err(err) => return Ok(ApiError::from(err).into_response()),
            };

            if !identity.active {
                return Ok(ApiError::UserInactive.into_response());
            }

            req.extensions_mut().insert(identity);
            inner.call(req).await
        })
    }
}

fn extract_bearer(req: &Request<Body>) -> Result<String, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| ApiError::InvalidToken)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
        .ok_or(ApiError::Unauthorized)
}

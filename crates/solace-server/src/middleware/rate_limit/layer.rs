//! Rate limit middleware layer.
//!
//! Sits outside authentication so over-limit clients are turned away
//! before any signature or store work happens. Every response passing
//! through gains the `X-RateLimit-*` headers.

use super::{
    store::{InMemoryRateLimitStore, RateLimitStore},
    types::{RateLimitConfig, RateLimitDecision},
};
use crate::error::ApiError;
use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, HeaderName},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::{Layer, Service};

/// User agents longer than this share a key suffix.
const USER_AGENT_KEY_CHARS: usize = 50;

/// Rate limit layer.
#[derive(Clone)]
pub struct RateLimitLayer {
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl RateLimitLayer {
    /// Create a layer with its own in-memory counter store.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(InMemoryRateLimitStore::new()),
            config,
        }
    }

    /// Share a counter store across layers. Pair with
    /// [`RateLimitConfig::with_class`] to keep route classes from
    /// colliding on the same keys.
    pub fn with_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.store = store;
        self
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// Rate limit middleware service.
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl<S> Service<Request> for RateLimitService<S>
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
        let store = self.store.clone();
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let key = config.scoped_key(&client_key(&req));
            let decision = store.check(&key, &config).await;

            if !decision.allowed {
                let retry_after = decision.retry_after_secs().unwrap_or(1);
                tracing::warn!(
                    client = %key,
                    limit = decision.limit,
                    retry_after,
                    "rate limit exceeded"
                );

                let error = ApiError::RateLimited {
                    retry_after,
                    limit: decision.limit,
                    window: config.window.as_secs(),
                };
                let mut response = error.into_response();
                add_rate_limit_headers(response.headers_mut(), &decision);
                return Ok(response);
            }

            let mut response = inner.call(req).await?;
            add_rate_limit_headers(response.headers_mut(), &decision);
            Ok(response)
        })
    }
}

fn add_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    if let Ok(value) = decision.limit.to_string().parse() {
        headers.insert(HeaderName::from_static("x-ratelimit-limit"), value);
    }

    if let Ok(value) = decision.remaining.to_string().parse() {
        headers.insert(HeaderName::from_static("x-ratelimit-remaining"), value);
    }

    let reset_at = SystemTime::now() + decision.resets_in;
    if let Ok(epoch) = reset_at.duration_since(UNIX_EPOCH) {
        if let Ok(value) = epoch.as_secs().to_string().parse() {
            headers.insert(HeaderName::from_static("x-ratelimit-reset"), value);
        }
    }
}

/// Client key: resolved IP plus the leading characters of the user
/// agent, so distinct clients behind one NAT rarely share a bucket.
fn client_key(req: &Request<Body>) -> String {
    let ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .or_else(|| {
            req.headers()
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(String::from)
        })
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    format!("{ip}:{}", truncate_chars(user_agent, USER_AGENT_KEY_CHARS))
}

/// Truncate to at most `max` characters, never splitting a multi-byte
/// character.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

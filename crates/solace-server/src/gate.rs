//! Access gate assembly.
//!
//! Pulls the middleware stack together from one [`AccessConfig`]:
//! tracing outermost, then rate limiting, then authentication. Tier
//! requirements attach per route subtree via [`AccessGate::tier_layer`],
//! and resource access runs in the mutation path through
//! [`crate::lifecycle::LifecycleService::check_memorial_access`].

use crate::config::{validate_config, AccessConfig};
use crate::error::ApiResult;
use crate::middleware::auth::{AuthLayer, TokenCodec};
use crate::middleware::rate_limit::{
    InMemoryRateLimitStore, RateLimitConfig, RateLimitLayer, RateLimitStore,
};
use crate::middleware::tier::{TierLayer, TierPolicy};
use crate::store::IdentityStore;
use axum::Router;
use solace_access_types::{SubscriptionTier, TierCatalog};
use solace_common_core::UserId;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// The assembled request gate.
///
/// Construct once at startup with [`AccessGate::from_config`], then
/// [`apply`](AccessGate::apply) it to the application router.
pub struct AccessGate {
    codec: Arc<TokenCodec>,
    identities: Arc<dyn IdentityStore>,
    rate_store: Arc<dyn RateLimitStore>,
    rate_config: RateLimitConfig,
    rate_enabled: bool,
    tier_policy: Arc<TierPolicy>,
    tier_catalog: TierCatalog,
}

impl AccessGate {
    /// Build a gate from validated configuration.
    pub fn from_config(
        config: &AccessConfig,
        identities: Arc<dyn IdentityStore>,
    ) -> anyhow::Result<Self> {
        if let Err(errors) = validate_config(config) {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("invalid access configuration: {joined}");
        }

        let codec = TokenCodec::from_config(&config.auth)?;

        Ok(Self {
            codec: Arc::new(codec),
            identities,
            rate_store: Arc::new(InMemoryRateLimitStore::new()),
            rate_config: RateLimitConfig::from_settings(&config.rate_limit),
            rate_enabled: config.rate_limit.enabled,
            tier_policy: Arc::new(TierPolicy::from_settings(&config.tiers)),
            tier_catalog: config.tiers.catalog(),
        })
    }

    /// Swap in a shared rate limit counter store.
    pub fn with_rate_limit_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.rate_store = store;
        self
    }

    /// Swap in a tier policy built elsewhere.
    pub fn with_tier_policy(mut self, policy: Arc<TierPolicy>) -> Self {
        self.tier_policy = policy;
        self
    }

    /// Layer the gate onto a router.
    ///
    /// Requests flow trace, then rate limit, then auth, then the
    /// router's own layers and handlers. An over-limit client is
    /// rejected before its token is ever inspected.
    pub fn apply(&self, router: Router) -> Router {
        let mut router = router.layer(AuthLayer::new(
            self.codec.clone(),
            self.identities.clone(),
        ));

        if self.rate_enabled {
            let layer =
                RateLimitLayer::new(self.rate_config.clone()).with_store(self.rate_store.clone());
            router = router.layer(layer);
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Tier requirement layer for a route subtree.
    pub fn tier_layer(&self, required: SubscriptionTier) -> TierLayer {
        TierLayer::new(self.tier_policy.clone(), required)
    }

    /// Sign a token for a user. For login and refresh handlers.
    pub fn issue_token(&self, subject: UserId) -> ApiResult<String> {
        self.codec.issue(subject)
    }

    /// The policy the gate authorizes tiers against.
    pub fn tier_policy(&self) -> Arc<TierPolicy> {
        self.tier_policy.clone()
    }

    /// The quota catalog downgrades plan against.
    pub fn tier_catalog(&self) -> &TierCatalog {
        &self.tier_catalog
    }
}

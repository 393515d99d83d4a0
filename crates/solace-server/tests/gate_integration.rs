//! End-to-end tests of the assembled access gate.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use serde_json::Value;
use solace_access_types::{Identity, SubscriptionTier};
use solace_common_core::UserId;
use solace_server::{
    config::{AccessConfig, AuthConfig, RateLimitSettings, TierSettings},
    middleware::{CurrentIdentity, TokenCodec},
    store::{IdentityStore, MemoryIdentityStore, StoreError},
    AccessGate,
};
use solace_test_utils::{free_user, lapsed_premium_user, premium_user};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-0123456789abcdef";

fn config(max_requests: u32, window_secs: u64) -> AccessConfig {
    AccessConfig {
        auth: AuthConfig {
            jwt_secret: SECRET.to_string(),
            algorithm: "HS256".to_string(),
            token_ttl_minutes: 30,
        },
        rate_limit: RateLimitSettings {
            enabled: true,
            max_requests,
            window_secs,
            cleanup_interval_secs: 60,
        },
        tiers: TierSettings::default(),
    }
}

fn codec() -> TokenCodec {
    TokenCodec::new(SECRET, Algorithm::HS256, Duration::minutes(30))
}

async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
    identity.id.to_string()
}

/// Gate over one open route plus tier-gated subtrees.
fn app_with(gate: &AccessGate) -> Router {
    let router = Router::new()
        .route("/whoami", get(whoami))
        .merge(
            Router::new()
                .route("/premium", get(whoami))
                .layer(gate.tier_layer(SubscriptionTier::Premium)),
        )
        .merge(
            Router::new()
                .route("/open-tier", get(whoami))
                .layer(gate.tier_layer(SubscriptionTier::Free)),
        );
    gate.apply(router)
}

fn gate_with_users(
    config: &AccessConfig,
    users: &[Identity],
) -> (AccessGate, Arc<MemoryIdentityStore>) {
    let store = Arc::new(MemoryIdentityStore::new());
    for user in users {
        store.upsert(user.clone());
    }
    let gate = AccessGate::from_config(config, store.clone()).expect("gate config is valid");
    (gate, store)
}

fn request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .header("x-forwarded-for", "1.2.3.4")
        .header("user-agent", "curl");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (gate, _) = gate_with_users(&config(100, 60), &[]);
    let app = app_with(&gate);

    let response = app.oneshot(request("/whoami", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_invalid_token() {
    let (gate, _) = gate_with_users(&config(100, 60), &[]);
    let app = app_with(&gate);

    let response = app
        .oneshot(request("/whoami", Some("not.a.jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["errorCode"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token_is_token_expired() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let stale = codec()
        .issue_at(user.id, Utc::now() - Duration::hours(2))
        .unwrap();
    let response = app.oneshot(request("/whoami", Some(&stale))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["errorCode"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_unknown_user_is_user_not_found() {
    let (gate, _) = gate_with_users(&config(100, 60), &[]);
    let app = app_with(&gate);

    let token = gate.issue_token(UserId::new()).unwrap();
    let response = app.oneshot(request("/whoami", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["errorCode"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_inactive_user_is_user_inactive() {
    let user = free_user().deactivated();
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app.oneshot(request("/whoami", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["errorCode"], "USER_INACTIVE");
}

#[tokio::test]
async fn test_valid_token_reaches_handler_with_identity() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app.oneshot(request("/whoami", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-ratelimit-limit").unwrap(),
        "100"
    );
    assert_eq!(
        response.headers().get("x-ratelimit-remaining").unwrap(),
        "99"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes, user.id.to_string().as_bytes());
}

#[tokio::test]
async fn test_sixth_request_in_window_is_rejected() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(5, 60), &[user.clone()]);
    let app = app_with(&gate);
    let token = gate.issue_token(user.id).unwrap();

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(request("/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(request("/whoami", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    assert_eq!(
        response.headers().get("x-ratelimit-remaining").unwrap(),
        "0"
    );

    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(body["limit"], 5);
    assert_eq!(body["window"], 60);
    let retry_after = body["retryAfter"].as_u64().unwrap();
    assert!((1..=60).contains(&retry_after));
}

#[tokio::test]
async fn test_rate_limit_rejects_before_token_verification() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(1, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let first = app
        .clone()
        .oneshot(request("/whoami", Some(&token)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Over the limit, even a garbage token gets the 429, not a 401:
    // the counter is checked first.
    let second = app
        .oneshot(request("/whoami", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(second).await["errorCode"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_store_failure_is_lookup_failed_not_user_not_found() {
    struct FailingIdentityStore;

    #[async_trait::async_trait]
    impl IdentityStore for FailingIdentityStore {
        async fn load(&self, _id: UserId) -> Result<Option<Identity>, StoreError> {
            Err(StoreError::Unavailable("identity db down".to_string()))
        }
    }

    let gate = AccessGate::from_config(&config(100, 60), Arc::new(FailingIdentityStore))
        .expect("gate config is valid");
    let app = app_with(&gate);

    let token = gate.issue_token(UserId::new()).unwrap();
    let response = app.oneshot(request("/whoami", Some(&token))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["errorCode"], "LOOKUP_FAILED");
}

#[tokio::test]
async fn test_free_tier_on_premium_route_is_tier_required() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app
        .oneshot(request("/premium", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "TIER_REQUIRED");
    assert_eq!(body["details"]["requiredTier"], "premium");
}

#[tokio::test]
async fn test_lapsed_subscription_is_subscription_expired() {
    let user = lapsed_premium_user(Utc::now());
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app
        .oneshot(request("/premium", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["errorCode"],
        "SUBSCRIPTION_EXPIRED"
    );
}

#[tokio::test]
async fn test_lapsed_subscription_still_passes_free_requirement() {
    let user = lapsed_premium_user(Utc::now());
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app
        .oneshot(request("/open-tier", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_current_subscription_passes_premium_requirement() {
    let user = premium_user(Utc::now());
    let (gate, _) = gate_with_users(&config(100, 60), &[user.clone()]);
    let app = app_with(&gate);

    let token = gate.issue_token(user.id).unwrap();
    let response = app
        .oneshot(request("/premium", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_tier_check_runs_only_after_authentication() {
    let (gate, _) = gate_with_users(&config(100, 60), &[]);
    let app = app_with(&gate);

    // No token on a premium route: the auth stage answers, not the
    // tier stage.
    let response = app.oneshot(request("/premium", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["errorCode"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rate_limit_disabled_skips_the_counter() {
    let mut relaxed = config(1, 60);
    relaxed.rate_limit.enabled = false;

    let user = free_user();
    let (gate, _) = gate_with_users(&relaxed, &[user.clone()]);
    let app = app_with(&gate);
    let token = gate.issue_token(user.id).unwrap();

    // Far past what the limit would allow.
    for _ in 0..4 {
        let response = app
            .clone()
            .oneshot(request("/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }
}

#[tokio::test]
async fn test_clients_with_distinct_keys_do_not_share_windows() {
    let user = free_user();
    let (gate, _) = gate_with_users(&config(1, 60), &[user.clone()]);
    let app = app_with(&gate);
    let token = gate.issue_token(user.id).unwrap();

    let first = app
        .clone()
        .oneshot(request("/whoami", Some(&token)))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Same IP, different user agent: a different client key.
    let other_client = Request::builder()
        .uri("/whoami")
        .header("x-forwarded-for", "1.2.3.4")
        .header("user-agent", "wget")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let second = app.oneshot(other_client).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
}

//! Revocation, version bumps, rehydration and deadlines

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::domain::entities::revoked_token::RevokedTokenRecord;
use crate::domain::value_objects::RequestContext;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RevokedTokenRepository, UserRepository};
use crate::services::revocation::{deny_list_key, token_version_key, RevocationCache};
use crate::services::testing::{ctx, roles, Harness};
use crate::services::token::{TokenAuthority, TokenAuthorityConfig};

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(e)) => e,
        other => panic!("expected token rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_revoked_token_is_rejected() {
    let h = Harness::new();
    let user = h.seed_user("alice@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();

    assert_eq!(
        token_error(h.authority.validate(&ctx(), &issued.token).await),
        TokenError::Revoked
    );
    let record = h.revoked_tokens.get(&issued.claims.jti).await.unwrap();
    assert_eq!(record.user_id, user.id);
    assert_eq!(record.token_version, 0);
}

#[tokio::test]
async fn test_revocation_survives_cache_restart_after_rehydrate() {
    let h = Harness::new();
    let user = h.seed_user("bob@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();
    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();

    h.cache.flush().await;
    // A cold cache alone would let the token through
    assert!(h.authority.validate(&ctx(), &issued.token).await.is_ok());

    let report = h.authority.rehydrate_cache(&ctx()).await.unwrap();
    assert_eq!(report.restored, 1);
    assert_eq!(
        token_error(h.authority.validate(&ctx(), &issued.token).await),
        TokenError::Revoked
    );
}

#[tokio::test]
async fn test_revoke_twice_is_idempotent() {
    let h = Harness::new();
    let user = h.seed_user("carol@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();
    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();

    assert_eq!(h.revoked_tokens.len().await, 1);
    assert_eq!(
        token_error(h.authority.validate(&ctx(), &issued.token).await),
        TokenError::Revoked
    );
}

#[tokio::test]
async fn test_deny_list_ttl_matches_remaining_lifetime() {
    let h = Harness::new();
    let user = h.seed_user("dave@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();

    let ttl = h.cache.ttl(&deny_list_key(&issued.claims.jti)).await.unwrap();
    assert!(ttl <= StdDuration::from_secs(3600));
    assert!(ttl > StdDuration::from_secs(3500));
}

#[tokio::test]
async fn test_revoking_expired_token_records_without_mirror() {
    let h = Harness::new();
    let user = h.seed_user("erin@example.com", "password123").await;
    let now = Utc::now();
    let record = RevokedTokenRecord::new(
        "expired-jti",
        user.id,
        0,
        now - Duration::hours(2),
        now - Duration::hours(1),
        now,
    );

    h.authority.revoke(&ctx(), record).await.unwrap();

    assert!(h.revoked_tokens.get("expired-jti").await.is_some());
    assert!(!h.cache.exists(&deny_list_key("expired-jti")).await.unwrap());
}

#[tokio::test]
async fn test_store_failure_aborts_revoke_without_mirror() {
    let h = Harness::new();
    let user = h.seed_user("frank@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.revoked_tokens.set_unavailable(true);
    let result = h.authority.revoke_claims(&ctx(), &issued.claims).await;

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert!(!h.cache.exists(&deny_list_key(&issued.claims.jti)).await.unwrap());
    assert!(h.authority.validate(&ctx(), &issued.token).await.is_ok());
}

#[tokio::test]
async fn test_mirror_failure_is_swallowed_and_healed_by_rehydrate() {
    let h = Harness::new();
    let user = h.seed_user("gina@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.cache.set_reject_writes(true);
    h.authority.revoke_claims(&ctx(), &issued.claims).await.unwrap();
    assert!(h.revoked_tokens.get(&issued.claims.jti).await.is_some());

    h.cache.set_reject_writes(false);
    h.authority.rehydrate_cache(&ctx()).await.unwrap();

    assert_eq!(
        token_error(h.authority.validate(&ctx(), &issued.token).await),
        TokenError::Revoked
    );
}

#[tokio::test]
async fn test_bump_version_scenario() {
    let h = Harness::new();
    let user = h.seed_user("u1@example.com", "password123").await;

    let token_a = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();
    assert!(h.authority.validate(&ctx(), &token_a.token).await.is_ok());

    let version = h.authority.bump_version(&ctx(), user.id).await.unwrap();
    assert_eq!(version, 1);

    assert_eq!(
        token_error(h.authority.validate(&ctx(), &token_a.token).await),
        TokenError::StaleVersion
    );

    let token_b = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();
    let claims = h.authority.validate(&ctx(), &token_b.token).await.unwrap();
    assert_eq!(claims.ver, 1);
}

#[tokio::test]
async fn test_bump_version_overwrites_cached_version() {
    let h = Harness::new();
    let user = h.seed_user("hank@example.com", "password123").await;
    h.cache
        .set(&token_version_key(user.id), "0", StdDuration::from_secs(60))
        .await
        .unwrap();

    h.authority.bump_version(&ctx(), user.id).await.unwrap();
    h.authority.bump_version(&ctx(), user.id).await.unwrap();

    let cached = h.cache.get(&token_version_key(user.id)).await.unwrap();
    assert_eq!(cached.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_failed_version_mirror_does_not_revive_old_tokens() {
    let h = Harness::new();
    let user = h.seed_user("iris@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();
    assert!(h.authority.validate(&ctx(), &issued.token).await.is_ok());

    h.cache.set_reject_writes(true);
    let version = h.authority.bump_version(&ctx(), user.id).await.unwrap();
    h.cache.set_reject_writes(false);

    assert_eq!(version, 1);
    let cached = h.cache.get(&token_version_key(user.id)).await.unwrap();
    assert_eq!(cached.as_deref(), Some("0"));

    let result = h.authority.validate(&ctx(), &issued.token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::StaleVersion))));

    let repaired = h.cache.get(&token_version_key(user.id)).await.unwrap();
    assert_eq!(repaired.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_unmirrored_bump_rejects_old_tokens_while_cache_refuses_writes() {
    let h = Harness::new();
    let user = h.seed_user("ivan@example.com", "password123").await;
    let old = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.cache.set_reject_writes(true);
    h.authority.bump_version(&ctx(), user.id).await.unwrap();

    let result = h.authority.validate(&ctx(), &old.token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::StaleVersion))));

    let fresh = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(fresh.claims.ver, 1);
    assert!(h.authority.validate(&ctx(), &fresh.token).await.is_ok());
}

#[tokio::test]
async fn test_bump_version_store_failure_leaves_cache_untouched() {
    let h = Harness::new();
    let user = h.seed_user("ivy@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    h.users.set_unavailable(true);
    let result = h.authority.bump_version(&ctx(), user.id).await;
    h.users.set_unavailable(false);

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert!(h.authority.validate(&ctx(), &issued.token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bumps_are_not_lost() {
    let h = Harness::new();
    let user = h.seed_user("jack@example.com", "password123").await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let authority = h.authority.clone();
            tokio::spawn(async move { authority.bump_version(&ctx(), user.id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = h.users.get_token_version(user.id).await.unwrap();
    assert_eq!(stored, Some(10));
}

#[tokio::test]
async fn test_rehydrate_skips_expired_records() {
    let h = Harness::new();
    let now = Utc::now();
    let user_id = uuid::Uuid::new_v4();

    for (jti, expires_in) in [("live-1", 1), ("live-2", 2), ("dead", -1)] {
        h.revoked_tokens
            .insert(RevokedTokenRecord::new(
                jti,
                user_id,
                0,
                now - Duration::hours(3),
                now + Duration::hours(expires_in),
                now - Duration::hours(3),
            ))
            .await
            .unwrap();
    }

    let report = h.authority.rehydrate_cache(&ctx()).await.unwrap();

    assert_eq!(report.restored, 2);
    assert!(h.cache.exists(&deny_list_key("live-2")).await.unwrap());
    assert!(!h.cache.exists(&deny_list_key("dead")).await.unwrap());
}

#[tokio::test]
async fn test_rehydrate_counts_cache_failures() {
    let h = Harness::new();
    let now = Utc::now();
    h.revoked_tokens
        .insert(RevokedTokenRecord::new(
            "jti",
            uuid::Uuid::new_v4(),
            0,
            now,
            now + Duration::hours(1),
            now,
        ))
        .await
        .unwrap();
    h.cache.set_reject_writes(true);

    let report = h.authority.rehydrate_cache(&ctx()).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.restored, 0);
}

/// Cache that answers only after a delay
struct SlowCache {
    inner: Arc<dyn RevocationCache>,
    delay: StdDuration,
}

#[async_trait]
impl RevocationCache for SlowCache {
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.exists(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: StdDuration) -> Result<(), DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_is_timeout_not_verdict() {
    let h = Harness::new();
    let user = h.seed_user("kate@example.com", "password123").await;
    let issued = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    let slow = TokenAuthority::new(
        h.keys.clone(),
        Arc::new(SlowCache {
            inner: h.cache.clone(),
            delay: StdDuration::from_secs(1),
        }),
        h.users.clone(),
        h.revoked_tokens.clone(),
        TokenAuthorityConfig::default(),
    );
    let tight = RequestContext::new("slow", StdDuration::from_millis(50));

    let result = slow.validate(&tight, &issued.token).await;

    assert!(matches!(result, Err(DomainError::Timeout)));
}

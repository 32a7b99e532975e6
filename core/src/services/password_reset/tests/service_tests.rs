//! Unit tests for the password reset flow

use std::sync::Arc;

use chrono::{Duration, Utc};
use tl_shared::ResetConfig;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::{DomainError, ResetError, TokenError, ValidationError};
use crate::repositories::{ResetTokenRepository, UserRepository};
use crate::services::auth::verify_password;
use crate::services::password_reset::{PasswordResetService, RecordingResetDelivery};
use crate::services::testing::{ctx, roles, Harness, TEST_BCRYPT_COST};

fn service(h: &Harness, delivery: Arc<RecordingResetDelivery>) -> PasswordResetService {
    PasswordResetService::new(
        h.users.clone(),
        h.reset_tokens.clone(),
        h.authority.clone(),
        delivery,
        ResetConfig::default(),
        TEST_BCRYPT_COST,
    )
}

#[tokio::test]
async fn test_reset_scenario() {
    let h = Harness::new();
    let delivery = Arc::new(RecordingResetDelivery::new());
    let resets = service(&h, delivery.clone());
    let user = h.seed_user("a@b.com", "oldpassword").await;
    let session = h
        .authority
        .issue(&ctx(), user.id, roles(&["user"]), Duration::hours(1))
        .await
        .unwrap();

    let token = resets.request_reset(&ctx(), "a@b.com").await.unwrap().unwrap();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(delivery.last_token_for("a@b.com").await.as_deref(), Some(token.as_str()));

    let updated = resets.submit_reset(&ctx(), &token, "newpassword").await.unwrap();
    assert_eq!(updated.token_version, 1);
    assert!(verify_password("newpassword", &updated.password_hash).await.unwrap());

    let stale = h.authority.validate(&ctx(), &session.token).await;
    assert!(matches!(stale, Err(DomainError::Token(TokenError::StaleVersion))));

    let again = resets.submit_reset(&ctx(), &token, "anotherpassword").await;
    assert!(matches!(again, Err(DomainError::Reset(ResetError::TokenNotFound))));
}

#[tokio::test]
async fn test_unknown_email_returns_nothing() {
    let h = Harness::new();
    let delivery = Arc::new(RecordingResetDelivery::new());
    let resets = service(&h, delivery.clone());

    let token = resets.request_reset(&ctx(), "ghost@example.com").await.unwrap();

    assert!(token.is_none());
    assert!(delivery.sent().await.is_empty());
}

#[tokio::test]
async fn test_inactive_account_gets_no_token() {
    let h = Harness::new();
    let resets = service(&h, Arc::new(RecordingResetDelivery::new()));
    let mut user = h.seed_user("gone@example.com", "password123").await;
    user.soft_delete();
    h.users.insert_user(user).await;

    assert!(resets.request_reset(&ctx(), "gone@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_only_hash_is_stored() {
    let h = Harness::new();
    let resets = service(&h, Arc::new(RecordingResetDelivery::new()));
    h.seed_user("hash@example.com", "password123").await;

    let token = resets.request_reset(&ctx(), "hash@example.com").await.unwrap().unwrap();

    assert!(h.reset_tokens.find_by_hash(&token).await.unwrap().is_none());
    let stored = h.reset_tokens.find_by_hash(&ResetToken::hash(&token)).await.unwrap().unwrap();
    assert_eq!(stored.email, "hash@example.com");
    assert_eq!(stored.expires_at - stored.issued_at, Duration::hours(24));
}

#[tokio::test]
async fn test_submit_consumes_every_outstanding_token() {
    let h = Harness::new();
    let resets = service(&h, Arc::new(RecordingResetDelivery::new()));
    let user = h.seed_user("multi@example.com", "password123").await;

    let first = resets.request_reset(&ctx(), "multi@example.com").await.unwrap().unwrap();
    let second = resets.request_reset(&ctx(), "multi@example.com").await.unwrap().unwrap();
    assert_eq!(h.reset_tokens.count_for_user(user.id).await, 2);

    resets.submit_reset(&ctx(), &second, "newpassword").await.unwrap();

    assert_eq!(h.reset_tokens.count_for_user(user.id).await, 0);
    let result = resets.submit_reset(&ctx(), &first, "newpassword").await;
    assert!(matches!(result, Err(DomainError::Reset(ResetError::TokenNotFound))));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let h = Harness::new();
    let resets = service(&h, Arc::new(RecordingResetDelivery::new()));
    let user = h.seed_user("late@example.com", "password123").await;

    h.reset_tokens
        .insert(ResetToken::new(
            "expired-token",
            user.id,
            "late@example.com",
            Utc::now() - Duration::hours(25),
            Duration::hours(24),
        ))
        .await
        .unwrap();

    let result = resets.submit_reset(&ctx(), "expired-token", "newpassword").await;

    assert!(matches!(result, Err(DomainError::Reset(ResetError::TokenExpired))));
    assert_eq!(h.users.get_token_version(user.id).await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_weak_password_keeps_token() {
    let h = Harness::new();
    let resets = service(&h, Arc::new(RecordingResetDelivery::new()));
    let user = h.seed_user("weak@example.com", "password123").await;
    let token = resets.request_reset(&ctx(), "weak@example.com").await.unwrap().unwrap();

    let result = resets.submit_reset(&ctx(), &token, "short").await;

    assert!(matches!(result, Err(DomainError::Validation(ValidationError::InvalidLength { .. }))));
    assert_eq!(h.reset_tokens.count_for_user(user.id).await, 1);
}

#[tokio::test]
async fn test_delivery_failure_is_not_reported() {
    let h = Harness::new();
    let delivery = Arc::new(RecordingResetDelivery::new());
    delivery.set_failing(true);
    let resets = service(&h, delivery);
    h.seed_user("mail@example.com", "password123").await;

    let token = resets.request_reset(&ctx(), "mail@example.com").await.unwrap();

    assert!(token.is_some());
}

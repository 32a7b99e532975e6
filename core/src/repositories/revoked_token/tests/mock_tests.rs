//! Unit tests for mock revoked token repository implementation

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::revoked_token::RevokedTokenRecord;
use crate::repositories::revoked_token::{MockRevokedTokenRepository, RevokedTokenRepository};

fn record(token_id: &str, expires_in: Duration) -> RevokedTokenRecord {
    let now = Utc::now();
    RevokedTokenRecord::new(token_id, Uuid::new_v4(), 0, now, now + expires_in, now)
}

#[tokio::test]
async fn test_insert_is_idempotent() {
    let repo = MockRevokedTokenRepository::new();

    assert!(repo.insert(record("jti-1", Duration::hours(1))).await.unwrap());
    assert!(!repo.insert(record("jti-1", Duration::hours(1))).await.unwrap());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_list_unexpired_skips_expired_records() {
    let repo = MockRevokedTokenRepository::new();
    repo.insert(record("live", Duration::hours(1))).await.unwrap();
    repo.insert(record("dead", Duration::hours(-1))).await.unwrap();

    let live = repo.list_unexpired(Utc::now()).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].token_id, "live");
}

#[tokio::test]
async fn test_delete_expired_before_cutoff() {
    let repo = MockRevokedTokenRepository::new();
    repo.insert(record("old", Duration::days(-40))).await.unwrap();
    repo.insert(record("recent", Duration::days(-1))).await.unwrap();
    repo.insert(record("live", Duration::hours(1))).await.unwrap();

    let deleted = repo
        .delete_expired_before(Utc::now() - Duration::days(30))
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(repo.get("old").await.is_none());
    assert!(repo.get("recent").await.is_some());
}

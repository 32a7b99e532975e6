//! Unit tests for mock user repository implementation

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{MockUserRepository, UserRepository};

fn user(email: &str) -> User {
    User::new(email, "$2b$04$placeholder".to_string())
}

#[tokio::test]
async fn test_create_and_find_user() {
    let repo = MockUserRepository::new();
    let created = repo.create(user("Alice@Example.com")).await.unwrap();

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "alice@example.com");

    let by_email = repo.find_by_email("ALICE@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let repo = MockUserRepository::new();
    repo.create(user("bob@example.com")).await.unwrap();

    let result = repo.create(user("bob@example.com")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_increment_token_version() {
    let repo = MockUserRepository::new();
    let created = repo.create(user("carol@example.com")).await.unwrap();

    assert_eq!(repo.get_token_version(created.id).await.unwrap(), Some(0));
    assert_eq!(repo.increment_token_version(created.id).await.unwrap(), Some(1));
    assert_eq!(repo.increment_token_version(created.id).await.unwrap(), Some(2));
    assert_eq!(repo.get_token_version(created.id).await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_increment_unknown_user() {
    let repo = MockUserRepository::new();
    assert_eq!(repo.increment_token_version(Uuid::new_v4()).await.unwrap(), None);
    assert_eq!(repo.get_token_version(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let repo = Arc::new(MockUserRepository::new());
    let created = repo.create(user("dave@example.com")).await.unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_token_version(created.id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.get_token_version(created.id).await.unwrap(), Some(20));
}

#[tokio::test]
async fn test_soft_delete_only_once() {
    let repo = MockUserRepository::new();
    let created = repo.create(user("erin@example.com")).await.unwrap();

    assert!(repo.soft_delete(created.id).await.unwrap());
    assert!(!repo.soft_delete(created.id).await.unwrap());

    let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(!stored.can_authenticate());
}

#[tokio::test]
async fn test_unavailable_store() {
    let repo = MockUserRepository::new();
    repo.set_unavailable(true);

    let result = repo.find_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}

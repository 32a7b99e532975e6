//! Unit tests for the user entity

use crate::domain::entities::user::{normalize_email, User, DEFAULT_ROLE};

#[test]
fn test_new_user() {
    let user = User::new("  Traveller@Example.COM ", "hash".to_string());

    assert_eq!(user.email, "traveller@example.com");
    assert_eq!(user.token_version, 0);
    assert_eq!(user.roles, vec![DEFAULT_ROLE.to_string()]);
    assert!(user.can_authenticate());
}

#[test]
fn test_deleted_user_cannot_authenticate() {
    let mut user = User::new("a@b.com", "hash".to_string());
    user.soft_delete();

    assert!(!user.can_authenticate());
    assert!(!user.is_active);
    assert!(user.deleted_at.is_some());
}

#[test]
fn test_inactive_user_cannot_authenticate() {
    let mut user = User::new("a@b.com", "hash".to_string());
    user.deactivate();

    assert!(!user.can_authenticate());
    assert!(user.deleted_at.is_none());
}

#[test]
fn test_password_hash_is_not_serialized() {
    let user = User::new("a@b.com", "secret-hash".to_string());
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("secret-hash"));
}

#[test]
fn test_normalize_email() {
    assert_eq!(normalize_email("A@B.com"), "a@b.com");
}

//! Revocation cache trait and key layout

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainError;

/// Prefix of deny-list entries, followed by the token id
pub const DENY_LIST_PREFIX: &str = "revoked:";

/// Prefix of mirrored token versions, followed by the user id
pub const TOKEN_VERSION_PREFIX: &str = "token_version:";

/// Cache key of the deny-list entry for a token id
pub fn deny_list_key(token_id: &str) -> String {
    format!("{}{}", DENY_LIST_PREFIX, token_id)
}

/// Cache key of the mirrored token version for a user
pub fn token_version_key(user_id: Uuid) -> String {
    format!("{}{}", TOKEN_VERSION_PREFIX, user_id)
}

/// Key/value operations consumed by the token authority
///
/// Calls are independent and must be safe to retry; setting the same entry
/// twice is harmless. Any transport failure is reported as
/// [`DomainError::CacheUnavailable`] so callers can fail closed.
#[async_trait]
pub trait RevocationCache: Send + Sync {
    /// Whether `key` is present and unexpired
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;

    /// Stores `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Reads `key`; `Ok(None)` is a miss
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
}

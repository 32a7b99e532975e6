//! Repository trait for password reset tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::DomainError;

/// Repository for single-use password reset tokens
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    /// Store a newly issued reset token
    async fn insert(&self, token: ResetToken) -> Result<(), DomainError>;

    /// Find a reset token by the digest of its opaque value
    ///
    /// Expired tokens are returned; expiry is judged by the caller.
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DomainError>;

    /// Delete every reset token belonging to a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete tokens that expired at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}

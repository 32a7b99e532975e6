//! Repository trait for revoked session token records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::revoked_token::RevokedTokenRecord;
use crate::errors::DomainError;

/// Durable audit trail of explicitly revoked tokens
///
/// Records outlive their cache mirror: the revocation cache drops an entry
/// when the token expires, while the store keeps it for audit and for
/// rehydrating a cold cache.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Insert a revocation record
    ///
    /// Inserting a token id that is already recorded is not an error.
    ///
    /// # Returns
    /// * `Ok(true)` - Record inserted
    /// * `Ok(false)` - Token id already recorded
    async fn insert(&self, record: RevokedTokenRecord) -> Result<bool, DomainError>;

    /// List every record whose token has not yet expired at `now`
    async fn list_unexpired(&self, now: DateTime<Utc>) -> Result<Vec<RevokedTokenRecord>, DomainError>;

    /// Delete records whose token expired before `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;
}

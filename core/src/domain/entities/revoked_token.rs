//! Durable audit record of an explicitly revoked session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::claims::Claims;

/// A session token revoked before its natural expiry
///
/// Persisted durably for audit and cache rehydration, and mirrored into the
/// revocation cache deny-list for the token's remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedTokenRecord {
    /// JWT ID of the revoked token
    pub token_id: String,

    /// Subject the token was issued to
    pub user_id: Uuid,

    /// Token version embedded in the revoked token
    pub token_version: i64,

    /// When the token was issued
    pub issued_at: DateTime<Utc>,

    /// When the token would have expired naturally
    pub expires_at: DateTime<Utc>,

    /// When the revocation was recorded
    pub revoked_at: DateTime<Utc>,
}

impl RevokedTokenRecord {
    pub fn new(
        token_id: impl Into<String>,
        user_id: Uuid,
        token_version: i64,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        revoked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            user_id,
            token_version,
            issued_at,
            expires_at,
            revoked_at,
        }
    }

    /// Builds a record for a validated token
    pub fn from_claims(claims: &Claims, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self::new(
            claims.jti.clone(),
            user_id,
            claims.ver,
            claims.issued_at(),
            claims.expires_at(),
            now,
        )
    }

    /// Remaining lifetime of the revoked token, `None` once it has expired
    ///
    /// A non-positive remainder means the token can no longer validate, so
    /// there is nothing to mirror into the cache.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        (self.expires_at - now)
            .to_std()
            .ok()
            .filter(|ttl| !ttl.is_zero())
    }
}

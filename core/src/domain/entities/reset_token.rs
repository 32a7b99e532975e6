//! Password reset token entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Single-use password reset token
///
/// Only the SHA-256 digest of the opaque token handed to the user is stored,
/// so a leaked table cannot be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetToken {
    /// Hex-encoded SHA-256 digest of the opaque token
    pub token_hash: String,

    /// Account the token resets
    pub user_id: Uuid,

    /// Email the token was requested for
    pub email: String,

    /// Timestamp when the token was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Creates a reset token record for a freshly generated opaque token
    pub fn new(
        raw_token: &str,
        user_id: Uuid,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            token_hash: Self::hash(raw_token),
            user_id,
            email: email.into(),
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Digest under which a raw token is stored and looked up
    pub fn hash(raw_token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Expiry is inclusive, matching session tokens.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

//! Session token claims.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Claims structure for the signed session token payload
///
/// A `Claims` value is only trustworthy once the token authority has checked
/// its signature, deny-list entry, expiry and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Roles granted to the subject at issuance
    #[serde(default)]
    pub roles: BTreeSet<String>,

    /// Token version of the subject at issuance
    pub ver: i64,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Creates claims for a new session token
    ///
    /// A fresh random `jti` is allocated for every call. Fails when
    /// `issued_at + ttl` is not a representable instant.
    pub fn new(
        user_id: Uuid,
        roles: BTreeSet<String>,
        version: i64,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Result<Self, ValidationError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ValidationError::InvalidDuration {
                field: "ttl".to_string(),
            })?;

        Ok(Self {
            sub: user_id.to_string(),
            roles,
            ver: version,
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        })
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Expiry is inclusive: a token whose `exp` equals `now` is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

//! Configuration for the token authority

use std::time::Duration as StdDuration;

use chrono::Duration;
use tl_shared::AuthConfig;

/// Configuration for the token authority
#[derive(Debug, Clone)]
pub struct TokenAuthorityConfig {
    /// Lifetime of tokens issued without an explicit duration
    pub access_token_ttl: Duration,
    /// JWT issuer claim, checked on validation
    pub issuer: String,
    /// JWT audience claim, checked on validation
    pub audience: String,
    /// TTL of mirrored token versions in the cache
    pub version_cache_ttl: StdDuration,
}

impl Default for TokenAuthorityConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for TokenAuthorityConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access_token_ttl: token_lifetime(config.access_token_ttl_seconds),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            version_cache_ttl: StdDuration::from_secs(config.version_cache_ttl_seconds),
        }
    }
}

/// Converts a configured lifetime in seconds without panicking
///
/// Values chrono cannot represent saturate to `Duration::MAX`, which `issue`
/// then rejects as an invalid duration.
pub(crate) fn token_lifetime(seconds: i64) -> Duration {
    Duration::try_seconds(seconds).unwrap_or(Duration::MAX)
}

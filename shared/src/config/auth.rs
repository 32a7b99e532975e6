//! Authentication configuration: signing keys, session tokens and password reset

use serde::{Deserialize, Serialize};

use super::env_or;

/// Session token and signing key configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Directory holding one PEM-encoded RSA private key per file
    pub keys_dir: String,

    /// Key id used to sign new tokens; defaults to the greatest loaded id
    #[serde(default)]
    pub signing_key_id: Option<String>,

    /// Session token lifetime in seconds
    pub access_token_ttl_seconds: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// TTL of the cached per-user token version in seconds
    ///
    /// Bounds how long another instance can trust a version whose bump
    /// could not be mirrored.
    #[serde(default = "default_version_cache_ttl")]
    pub version_cache_ttl_seconds: u64,

    /// Deadline applied to each request's cache and store calls, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Password reset token settings
    #[serde(default)]
    pub reset: ResetConfig,

    /// Expired record janitor settings
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            keys_dir: String::from("keys"),
            signing_key_id: None,
            access_token_ttl_seconds: 3600, // 1 hour
            issuer: String::from("travel-list"),
            audience: String::from("travel-list-api"),
            version_cache_ttl_seconds: default_version_cache_ttl(),
            request_timeout_ms: default_request_timeout_ms(),
            bcrypt_cost: default_bcrypt_cost(),
            reset: ResetConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            keys_dir: std::env::var("JWT_KEYS_DIR").unwrap_or(defaults.keys_dir),
            signing_key_id: std::env::var("JWT_SIGNING_KEY_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            access_token_ttl_seconds: env_or(
                "JWT_ACCESS_TOKEN_TTL",
                defaults.access_token_ttl_seconds,
            ),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            version_cache_ttl_seconds: env_or(
                "TOKEN_VERSION_CACHE_TTL",
                defaults.version_cache_ttl_seconds,
            ),
            request_timeout_ms: env_or("AUTH_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
            reset: ResetConfig::from_env(),
            cleanup: CleanupConfig::from_env(),
        }
    }

    /// Set the session token lifetime in minutes
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_seconds = minutes * 60;
        self
    }
}

/// Password reset token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetConfig {
    /// Number of random bytes in a reset token (hex-encoded on the wire)
    pub token_bytes: usize,

    /// Reset token lifetime in hours
    pub ttl_hours: i64,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            token_bytes: 32,
            ttl_hours: 24,
        }
    }
}

impl ResetConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_bytes: env_or("RESET_TOKEN_BYTES", defaults.token_bytes),
            ttl_hours: env_or("RESET_TOKEN_TTL_HOURS", defaults.ttl_hours),
        }
    }
}

/// Configuration for the expired record janitor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,

    /// How long revoked token records are kept after they expire (in days)
    pub retention_days: i64,

    /// Whether to run the janitor at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            retention_days: 30,
            enabled: true,
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: env_or("CLEANUP_INTERVAL_SECONDS", defaults.interval_seconds),
            retention_days: env_or("CLEANUP_RETENTION_DAYS", defaults.retention_days),
            enabled: env_or("CLEANUP_ENABLED", defaults.enabled),
        }
    }
}

fn default_version_cache_ttl() -> u64 {
    60
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_bcrypt_cost() -> u32 {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_seconds, 3600);
        assert_eq!(config.issuer, "travel-list");
        assert!(config.signing_key_id.is_none());
        assert_eq!(config.reset.token_bytes, 32);
        assert_eq!(config.reset.ttl_hours, 24);
    }

    #[test]
    fn test_access_ttl_builder() {
        let config = AuthConfig::default().with_access_ttl_minutes(30);
        assert_eq!(config.access_token_ttl_seconds, 1800);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let json = r#"{
            "keys_dir": "/etc/travel-list/keys",
            "access_token_ttl_seconds": 900,
            "issuer": "travel-list",
            "audience": "travel-list-api"
        }"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.keys_dir, "/etc/travel-list/keys");
        assert_eq!(config.version_cache_ttl_seconds, 60);
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.cleanup.enabled);
    }
}

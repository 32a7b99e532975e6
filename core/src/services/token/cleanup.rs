//! Token cleanup service for periodic maintenance of expired records
//!
//! Deletes reset tokens past their expiry and revoked token records past
//! their expiry plus a retention window. Neither deletion affects
//! validation: an expired token is rejected on its own `exp` before the
//! deny-list matters.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tl_shared::CleanupConfig;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{ResetTokenRepository, RevokedTokenRepository};

/// Service for cleaning up expired reset tokens and revocation records
pub struct TokenCleanupService {
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
    reset_tokens: Arc<dyn ResetTokenRepository>,
    config: CleanupConfig,
}

impl TokenCleanupService {
    /// Create a new token cleanup service
    pub fn new(
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
        reset_tokens: Arc<dyn ResetTokenRepository>,
        config: CleanupConfig,
    ) -> Self {
        Self {
            revoked_tokens,
            reset_tokens,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// A failure in one task is recorded in the result and does not stop
    /// the other.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting token cleanup cycle");

        let now = Utc::now();
        let mut result = CleanupResult::default();

        match self.reset_tokens.delete_expired(now).await {
            Ok(count) => result.reset_tokens_deleted = count,
            Err(e) => {
                error!("Failed to cleanup expired reset tokens: {}", e);
                result.errors.push(format!("Reset token cleanup error: {}", e));
            }
        }

        let cutoff = now - Duration::days(self.config.retention_days);
        match self.revoked_tokens.delete_expired_before(cutoff).await {
            Ok(count) => result.revoked_records_deleted = count,
            Err(e) => {
                error!("Failed to cleanup revoked token records: {}", e);
                result
                    .errors
                    .push(format!("Revoked token cleanup error: {}", e));
            }
        }

        info!(
            "Token cleanup completed - Reset tokens: {}, Revoked records: {}",
            result.reset_tokens_deleted, result.revoked_records_deleted
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Token cleanup cycle failed: {}", e);
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired reset tokens deleted
    pub reset_tokens_deleted: usize,
    /// Number of revoked token records past retention deleted
    pub revoked_records_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.reset_tokens_deleted + self.revoked_records_deleted
    }
}

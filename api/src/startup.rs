//! Startup steps that must finish before the server accepts traffic

use std::time::Duration;

use anyhow::bail;
use tl_core::domain::RequestContext;
use tl_core::services::{RehydrateReport, TokenAuthority};
use tracing::{info, warn};

/// Retry schedule for the startup deny-list rehydration
#[derive(Debug, Clone)]
pub struct RehydrationPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RehydrationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

/// Restores every unexpired revocation into the cache, retrying with backoff
///
/// An attempt only counts as complete when the store was read and every
/// record was mirrored. Serving with a partially restored deny-list would
/// let revoked tokens validate, so running out of attempts is an error the
/// caller must treat as fatal.
pub async fn rehydrate_revocations(
    authority: &TokenAuthority,
    policy: &RehydrationPolicy,
) -> anyhow::Result<RehydrateReport> {
    let mut backoff = policy.initial_backoff;

    for attempt in 1..=policy.max_attempts.max(1) {
        match authority.rehydrate_cache(&RequestContext::background()).await {
            Ok(report) if report.failed == 0 => {
                info!(
                    attempt,
                    restored = report.restored,
                    skipped = report.skipped,
                    "Startup rehydration finished"
                );
                return Ok(report);
            }
            Ok(report) => warn!(
                attempt,
                restored = report.restored,
                failed = report.failed,
                "Startup rehydration incomplete"
            ),
            Err(e) => warn!(attempt, error = %e, "Startup rehydration failed"),
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(policy.max_backoff);
        }
    }

    bail!(
        "revocation cache rehydration did not complete after {} attempts",
        policy.max_attempts.max(1)
    )
}

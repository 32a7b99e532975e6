//! Reset token delivery
//!
//! Outbound email is not wired in yet; tokens are handed off through the
//! log so local environments can complete the reset flow.

use async_trait::async_trait;
use tl_core::domain::RequestContext;
use tl_core::errors::DomainError;
use tl_core::services::ResetDelivery;
use tracing::info;

/// Delivers reset tokens by logging them
///
/// The token itself is only written when `expose_tokens` is set, which
/// should be limited to development environments.
pub struct LogResetDelivery {
    expose_tokens: bool,
}

impl LogResetDelivery {
    pub fn new(expose_tokens: bool) -> Self {
        Self { expose_tokens }
    }
}

#[async_trait]
impl ResetDelivery for LogResetDelivery {
    async fn deliver(&self, ctx: &RequestContext, email: &str, token: &str) -> Result<(), DomainError> {
        if self.expose_tokens {
            info!(trace_id = %ctx.trace_id(), email = %email, token = %token, "Password reset token issued");
        } else {
            info!(trace_id = %ctx.trace_id(), email = %email, "Password reset token issued");
        }
        Ok(())
    }
}

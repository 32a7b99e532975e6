//! Password reset service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use tl_shared::ResetConfig;
use tracing::{debug, error, info};

use crate::domain::entities::reset_token::ResetToken;
use crate::domain::entities::user::{normalize_email, User};
use crate::domain::value_objects::RequestContext;
use crate::errors::{AuthError, DomainResult, ResetError, ValidationError};
use crate::repositories::{ResetTokenRepository, UserRepository};
use crate::services::auth::{hash_password, validate_password};
use crate::services::token::TokenAuthority;

use super::delivery::ResetDelivery;

/// Issues and redeems single-use password reset tokens
pub struct PasswordResetService {
    users: Arc<dyn UserRepository>,
    reset_tokens: Arc<dyn ResetTokenRepository>,
    authority: Arc<TokenAuthority>,
    delivery: Arc<dyn ResetDelivery>,
    config: ResetConfig,
    bcrypt_cost: u32,
}

impl PasswordResetService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        reset_tokens: Arc<dyn ResetTokenRepository>,
        authority: Arc<TokenAuthority>,
        delivery: Arc<dyn ResetDelivery>,
        config: ResetConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            reset_tokens,
            authority,
            delivery,
            config,
            bcrypt_cost,
        }
    }

    /// Issues a reset token for `email` and hands it to the delivery channel
    ///
    /// Returns `None` when no active account owns the email. Callers must
    /// respond identically in both cases. A delivery failure is logged and
    /// not reported, for the same reason.
    pub async fn request_reset(&self, ctx: &RequestContext, email: &str) -> DomainResult<Option<String>> {
        let email = normalize_email(email);

        let user = match ctx.run(self.users.find_by_email(&email)).await? {
            Some(user) if user.can_authenticate() => user,
            _ => {
                debug!(trace_id = %ctx.trace_id(), "Password reset requested for unknown or inactive account");
                return Ok(None);
            }
        };

        let issued_at = Utc::now();
        let ttl = Duration::try_hours(self.config.ttl_hours)
            .filter(|ttl| issued_at.checked_add_signed(*ttl).is_some())
            .ok_or_else(|| ValidationError::InvalidDuration {
                field: "reset.ttl_hours".to_string(),
            })?;

        let raw_token = self.generate_token();
        let record = ResetToken::new(&raw_token, user.id, email.clone(), issued_at, ttl);
        ctx.run(self.reset_tokens.insert(record)).await?;

        if let Err(e) = self.delivery.deliver(ctx, &email, &raw_token).await {
            error!(trace_id = %ctx.trace_id(), user_id = %user.id, error = %e, "Failed to deliver reset token");
        }

        info!(trace_id = %ctx.trace_id(), user_id = %user.id, "Password reset token issued");
        Ok(Some(raw_token))
    }

    /// Redeems a reset token and sets a new password
    ///
    /// Deletes every reset token of the user and bumps the token version so
    /// all existing sessions end.
    ///
    /// # Errors
    ///
    /// * `ResetError::TokenNotFound` - unknown or already used token
    /// * `ResetError::TokenExpired` - token past its expiry
    /// * `ValidationError::InvalidLength` - new password outside policy
    pub async fn submit_reset(
        &self,
        ctx: &RequestContext,
        token: &str,
        new_password: &str,
    ) -> DomainResult<User> {
        validate_password(new_password)?;

        let record = ctx
            .run(self.reset_tokens.find_by_hash(&ResetToken::hash(token)))
            .await?
            .ok_or(ResetError::TokenNotFound)?;

        if record.is_expired_at(Utc::now()) {
            return Err(ResetError::TokenExpired.into());
        }

        let deleted = ctx.run(self.reset_tokens.delete_by_user(record.user_id)).await?;
        debug!(trace_id = %ctx.trace_id(), user_id = %record.user_id, deleted, "Reset tokens consumed");

        let hash = hash_password(new_password, self.bcrypt_cost).await?;
        if !ctx
            .run(self.users.update_password_hash(record.user_id, &hash))
            .await?
        {
            return Err(AuthError::UserNotFound.into());
        }

        self.authority.bump_version(ctx, record.user_id).await?;

        let user = ctx
            .run(self.users.find_by_id(record.user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!(trace_id = %ctx.trace_id(), user_id = %user.id, "Password reset completed");
        Ok(user)
    }

    fn generate_token(&self) -> String {
        let mut bytes = vec![0u8; self.config.token_bytes];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

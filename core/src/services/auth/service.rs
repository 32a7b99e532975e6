//! Authentication service implementation

use std::sync::Arc;

use chrono::Duration;
use tl_shared::AuthConfig;
use tokio::sync::OnceCell;
use tracing::info;

use crate::domain::entities::user::{normalize_email, User};
use crate::domain::value_objects::RequestContext;
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::UserRepository;
use crate::services::token::{token_lifetime, IssuedToken, TokenAuthority};

use super::password::{hash_password, validate_password, verify_password};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
    /// Lifetime of tokens issued on login and password change
    pub access_token_ttl: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            bcrypt_cost: config.bcrypt_cost,
            access_token_ttl: token_lifetime(config.access_token_ttl_seconds),
        }
    }
}

/// Verified against when the email is unknown, so both login failures cost
/// one bcrypt check
const TIMING_GUARD_PASSWORD: &str = "timing-guard-password";

/// Authentication service handling credential checks and session lifecycle
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    authority: Arc<TokenAuthority>,
    config: AuthServiceConfig,
    timing_guard_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        authority: Arc<TokenAuthority>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            authority,
            config,
            timing_guard_hash: OnceCell::new(),
        }
    }

    /// Create an account with the default role
    pub async fn register(&self, ctx: &RequestContext, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let hash = hash_password(password, self.config.bcrypt_cost).await?;
        let user = ctx.run(self.users.create(User::new(&email, hash))).await?;

        info!(trace_id = %ctx.trace_id(), user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a session token
    ///
    /// Unknown email and wrong password are indistinguishable, in result
    /// and in bcrypt work. The account state is only revealed once the
    /// password has matched.
    pub async fn login(&self, ctx: &RequestContext, email: &str, password: &str) -> DomainResult<IssuedToken> {
        let user = ctx
            .run(self.users.find_by_email(&normalize_email(email)))
            .await?;

        let Some(user) = user else {
            verify_password(password, self.timing_guard_hash().await?).await?;
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.can_authenticate() {
            return Err(AuthError::AccountInactive.into());
        }

        let issued = self
            .authority
            .issue(
                ctx,
                user.id,
                user.roles.iter().cloned().collect(),
                self.config.access_token_ttl,
            )
            .await?;

        info!(trace_id = %ctx.trace_id(), user_id = %user.id, "User logged in");
        Ok(issued)
    }

    /// Hash at the configured cost, computed on first use
    async fn timing_guard_hash(&self) -> DomainResult<&str> {
        let hash = self
            .timing_guard_hash
            .get_or_try_init(|| hash_password(TIMING_GUARD_PASSWORD, self.config.bcrypt_cost))
            .await?;
        Ok(hash.as_str())
    }

    #[cfg(test)]
    pub(crate) fn timing_guard_ready(&self) -> bool {
        self.timing_guard_hash.initialized()
    }

    /// Revoke the caller's current token
    pub async fn logout(&self, ctx: &RequestContext) -> DomainResult<()> {
        let claims = ctx.require_claims()?;
        self.authority.revoke_claims(ctx, claims).await
    }

    /// Invalidate every token of the caller, returning the new version
    pub async fn logout_all(&self, ctx: &RequestContext) -> DomainResult<i64> {
        let user_id = caller_id(ctx)?;
        self.authority.bump_version(ctx, user_id).await
    }

    /// Replace the caller's password and sign them back in
    ///
    /// Every existing session, including the one making the call, is
    /// invalidated; the returned token carries the new version.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<IssuedToken> {
        validate_password(new_password)?;
        let user_id = caller_id(ctx)?;

        let user = ctx
            .run(self.users.find_by_id(user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(current_password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let hash = hash_password(new_password, self.config.bcrypt_cost).await?;
        if !ctx.run(self.users.update_password_hash(user_id, &hash)).await? {
            return Err(AuthError::UserNotFound.into());
        }
        self.authority.bump_version(ctx, user_id).await?;

        info!(trace_id = %ctx.trace_id(), user_id = %user_id, "Password changed");

        self.authority
            .issue(
                ctx,
                user_id,
                user.roles.iter().cloned().collect(),
                self.config.access_token_ttl,
            )
            .await
    }

    /// Soft-delete the caller's account and invalidate its tokens
    pub async fn delete_account(&self, ctx: &RequestContext) -> DomainResult<()> {
        let user_id = caller_id(ctx)?;

        if !ctx.run(self.users.soft_delete(user_id)).await? {
            return Err(AuthError::UserNotFound.into());
        }
        self.authority.bump_version(ctx, user_id).await?;

        info!(trace_id = %ctx.trace_id(), user_id = %user_id, "Account deleted");
        Ok(())
    }
}

fn caller_id(ctx: &RequestContext) -> DomainResult<uuid::Uuid> {
    let claims = ctx.require_claims()?;
    claims
        .user_id()
        .map_err(|_| AuthError::Unauthenticated.into())
}

/// Minimal shape check; deliverability is the mailer's concern
pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

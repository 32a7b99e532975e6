//! Token authority: issues, validates and revokes signed session tokens

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::claims::Claims;
use crate::domain::entities::revoked_token::RevokedTokenRecord;
use crate::domain::value_objects::RequestContext;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{RevokedTokenRepository, UserRepository};
use crate::services::key_store::KeyStore;
use crate::services::revocation::{deny_list_key, token_version_key, RevocationCache};

use super::config::TokenAuthorityConfig;

/// Value stored under deny-list keys; only presence matters
const DENY_LIST_MARKER: &str = "1";

/// Attempts made to mirror a bumped version before giving up
const VERSION_MIRROR_ATTEMPTS: u32 = 3;

/// Base delay between version mirror attempts, grows linearly
const VERSION_MIRROR_RETRY_DELAY: StdDuration = StdDuration::from_millis(50);

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Outcome of repopulating the deny-list from the durable store
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RehydrateReport {
    /// Records mirrored back into the cache
    pub restored: usize,
    /// Records whose remaining lifetime was not positive
    pub skipped: usize,
    /// Records the cache refused
    pub failed: usize,
}

/// Issues and validates RS256 session tokens
///
/// Validation runs its checks in a fixed order and stops at the first
/// failure: signature, deny-list, expiry, version. The durable store is
/// written before the cache on every mutation, so the cache never claims a
/// revocation the store does not hold.
///
/// A bumped version that could not be mirrored is remembered as a floor.
/// Cached versions below the floor are ignored and the store is read
/// instead, until a later write brings the cache up to date.
pub struct TokenAuthority {
    keys: Arc<KeyStore>,
    cache: Arc<dyn RevocationCache>,
    users: Arc<dyn UserRepository>,
    revoked_tokens: Arc<dyn RevokedTokenRepository>,
    config: TokenAuthorityConfig,
    validation: Validation,
    unmirrored_versions: Mutex<HashMap<Uuid, i64>>,
}

impl TokenAuthority {
    pub fn new(
        keys: Arc<KeyStore>,
        cache: Arc<dyn RevocationCache>,
        users: Arc<dyn UserRepository>,
        revoked_tokens: Arc<dyn RevokedTokenRepository>,
        config: TokenAuthorityConfig,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        // Expiry is checked after the deny-list, with an inclusive boundary
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            keys,
            cache,
            users,
            revoked_tokens,
            config,
            validation,
            unmirrored_versions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TokenAuthorityConfig {
        &self.config
    }

    pub fn key_store(&self) -> &Arc<KeyStore> {
        &self.keys
    }

    /// Issues a token for `user_id` with the configured default lifetime
    pub async fn issue_default(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        roles: BTreeSet<String>,
    ) -> DomainResult<IssuedToken> {
        self.issue(ctx, user_id, roles, self.config.access_token_ttl)
            .await
    }

    /// Signs a new token stamped with the subject's current version
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - the subject has no stored version
    /// * `ValidationError::InvalidDuration` - `ttl` overflows the expiry timestamp
    /// * `KeyError::NotFound` - no issuance key is available
    /// * `CacheUnavailable` / `StoreUnavailable` / `Timeout` - version lookup failed
    pub async fn issue(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        roles: BTreeSet<String>,
        ttl: Duration,
    ) -> DomainResult<IssuedToken> {
        let version = self
            .current_version(ctx, user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let kid = self.keys.signing_key_id()?;
        let key = self.keys.get(&kid)?;

        let claims = Claims::new(
            user_id,
            roles,
            version,
            Utc::now(),
            ttl,
            &self.config.issuer,
            &self.config.audience,
        )?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid);

        let token = encode(&header, &claims, key.encoding_key()).map_err(|e| {
            warn!(trace_id = %ctx.trace_id(), error = %e, "Token signing failed");
            DomainError::Token(TokenError::SigningFailed)
        })?;

        debug!(
            trace_id = %ctx.trace_id(),
            user_id = %user_id,
            jti = %claims.jti,
            version,
            "Issued session token"
        );

        Ok(IssuedToken { token, claims })
    }

    /// Validates a token and returns its trusted claims
    ///
    /// The rejection reason is logged; callers should collapse every
    /// token rejection into a single unauthenticated response.
    pub async fn validate(&self, ctx: &RequestContext, token: &str) -> DomainResult<Claims> {
        let result = self.check(ctx, token).await;
        if let Err(e) = &result {
            debug!(trace_id = %ctx.trace_id(), reason = e.code(), "Token rejected");
        }
        result
    }

    async fn check(&self, ctx: &RequestContext, token: &str) -> DomainResult<Claims> {
        let claims = self.verify_signature(token)?;
        let user_id = claims.user_id().map_err(|_| TokenError::MalformedToken)?;

        if ctx.run(self.cache.exists(&deny_list_key(&claims.jti))).await? {
            return Err(TokenError::Revoked.into());
        }

        if claims.is_expired_at(Utc::now()) {
            return Err(TokenError::Expired.into());
        }

        match self.current_version(ctx, user_id).await? {
            Some(current) if current == claims.ver => Ok(claims),
            _ => Err(TokenError::StaleVersion.into()),
        }
    }

    fn verify_signature(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::MalformedToken)?;
        if header.alg != Algorithm::RS256 {
            return Err(TokenError::InvalidSignature);
        }
        let kid = header.kid.ok_or(TokenError::MalformedToken)?;

        // A retired key id is indistinguishable from a forged one
        let key = self
            .keys
            .public_key(&kid)
            .map_err(|_| TokenError::InvalidSignature)?;

        decode::<Claims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidRsaKey(_)
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience => TokenError::InvalidSignature,
                _ => TokenError::MalformedToken,
            })
    }

    /// Current token version of a subject, read through the cache
    ///
    /// A cache hit is trusted unless it is below a version this process
    /// bumped but failed to mirror. A miss reads the durable store and
    /// backfills the cache. A cache error is returned as-is so validation
    /// fails closed.
    async fn current_version(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> DomainResult<Option<i64>> {
        let key = token_version_key(user_id);

        if let Some(raw) = ctx.run(self.cache.get(&key)).await? {
            match raw.parse::<i64>() {
                Ok(version) if !self.below_unmirrored(user_id, version) => {
                    return Ok(Some(version))
                }
                Ok(version) => debug!(
                    trace_id = %ctx.trace_id(),
                    user_id = %user_id,
                    cached = version,
                    "Cached token version predates an unmirrored bump, reading store"
                ),
                Err(_) => warn!(
                    trace_id = %ctx.trace_id(),
                    user_id = %user_id,
                    "Unreadable cached token version, reading store"
                ),
            }
        }

        let version = ctx.run(self.users.get_token_version(user_id)).await?;

        if let Some(version) = version {
            match ctx
                .run(self.cache.set(
                    &key,
                    &version.to_string(),
                    self.config.version_cache_ttl,
                ))
                .await
            {
                Ok(()) => self.mark_mirrored(user_id, version),
                Err(DomainError::Timeout) => return Err(DomainError::Timeout),
                Err(e) => warn!(
                    trace_id = %ctx.trace_id(),
                    user_id = %user_id,
                    error = %e,
                    "Failed to backfill token version cache"
                ),
            }
        }

        Ok(version)
    }

    fn below_unmirrored(&self, user_id: Uuid, cached: i64) -> bool {
        self.unmirrored_versions
            .lock()
            .get(&user_id)
            .is_some_and(|floor| cached < *floor)
    }

    fn mark_unmirrored(&self, user_id: Uuid, version: i64) {
        let mut pending = self.unmirrored_versions.lock();
        let floor = pending.entry(user_id).or_insert(version);
        *floor = (*floor).max(version);
    }

    fn mark_mirrored(&self, user_id: Uuid, version: i64) {
        let mut pending = self.unmirrored_versions.lock();
        if pending.get(&user_id).is_some_and(|floor| *floor <= version) {
            pending.remove(&user_id);
        }
    }

    /// Writes a bumped version to the cache, retrying transient failures
    async fn mirror_version(&self, ctx: &RequestContext, user_id: Uuid, version: i64) -> DomainResult<()> {
        let key = token_version_key(user_id);
        let value = version.to_string();
        let mut attempt = 1;

        loop {
            let result = ctx
                .run(self.cache.set(&key, &value, self.config.version_cache_ttl))
                .await;

            match result {
                Ok(()) => return Ok(()),
                Err(DomainError::Timeout) => return Err(DomainError::Timeout),
                Err(e) if attempt >= VERSION_MIRROR_ATTEMPTS => return Err(e),
                Err(e) => {
                    debug!(
                        trace_id = %ctx.trace_id(),
                        user_id = %user_id,
                        attempt,
                        error = %e,
                        "Token version mirror failed, retrying"
                    );
                    tokio::time::sleep(VERSION_MIRROR_RETRY_DELAY * attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Revokes a single token
    ///
    /// The record is written durably first; if that fails nothing is
    /// mirrored. The deny-list entry lives for the token's remaining
    /// lifetime measured from `record.revoked_at`, and is skipped when that
    /// lifetime is not positive. Mirror failures are logged and the record
    /// is restored on the next rehydration.
    pub async fn revoke(&self, ctx: &RequestContext, record: RevokedTokenRecord) -> DomainResult<()> {
        let inserted = ctx.run(self.revoked_tokens.insert(record.clone())).await?;
        if !inserted {
            debug!(trace_id = %ctx.trace_id(), jti = %record.token_id, "Token already revoked");
        }

        let Some(ttl) = record.remaining_ttl(record.revoked_at) else {
            debug!(trace_id = %ctx.trace_id(), jti = %record.token_id, "Revoked token already expired, not mirrored");
            return Ok(());
        };

        if let Err(e) = ctx
            .run(self.cache.set(&deny_list_key(&record.token_id), DENY_LIST_MARKER, ttl))
            .await
        {
            warn!(
                trace_id = %ctx.trace_id(),
                jti = %record.token_id,
                error = %e,
                "Revocation recorded but deny-list mirror failed"
            );
        }

        info!(trace_id = %ctx.trace_id(), jti = %record.token_id, user_id = %record.user_id, "Token revoked");
        Ok(())
    }

    /// Revokes the token described by already-validated claims
    pub async fn revoke_claims(&self, ctx: &RequestContext, claims: &Claims) -> DomainResult<()> {
        let user_id = claims.user_id().map_err(|_| TokenError::MalformedToken)?;
        let record = RevokedTokenRecord::from_claims(claims, user_id, Utc::now());
        self.revoke(ctx, record).await
    }

    /// Invalidates every token issued to `user_id` so far
    ///
    /// Increments the stored version atomically, then overwrites the cached
    /// copy with the new value. The cache write is retried; if it still
    /// fails, validations in this process bypass the stale cached value
    /// until the cache catches up, and other processes see the new value
    /// once the cached entry's TTL runs out.
    pub async fn bump_version(&self, ctx: &RequestContext, user_id: Uuid) -> DomainResult<i64> {
        let version = ctx
            .run(self.users.increment_token_version(user_id))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match self.mirror_version(ctx, user_id, version).await {
            Ok(()) => self.mark_mirrored(user_id, version),
            Err(e) => {
                self.mark_unmirrored(user_id, version);
                warn!(
                    trace_id = %ctx.trace_id(),
                    user_id = %user_id,
                    version,
                    error = %e,
                    "Token version bumped but cache mirror failed"
                );
            }
        }

        info!(trace_id = %ctx.trace_id(), user_id = %user_id, version, "Token version bumped");
        Ok(version)
    }

    /// Restores deny-list entries for every unexpired revocation record
    ///
    /// Called once at startup so a restarted cache cannot let a revoked
    /// token through. Cache failures are counted, not fatal.
    pub async fn rehydrate_cache(&self, ctx: &RequestContext) -> DomainResult<RehydrateReport> {
        let now = Utc::now();
        let records = ctx.run(self.revoked_tokens.list_unexpired(now)).await?;
        let mut report = RehydrateReport::default();

        for record in records {
            let Some(ttl) = record.remaining_ttl(now) else {
                report.skipped += 1;
                continue;
            };

            match ctx
                .run(self.cache.set(&deny_list_key(&record.token_id), DENY_LIST_MARKER, ttl))
                .await
            {
                Ok(()) => report.restored += 1,
                Err(e) => {
                    warn!(jti = %record.token_id, error = %e, "Failed to restore deny-list entry");
                    report.failed += 1;
                }
            }
        }

        info!(
            trace_id = %ctx.trace_id(),
            restored = report.restored,
            skipped = report.skipped,
            failed = report.failed,
            "Revocation cache rehydrated"
        );
        Ok(report)
    }
}

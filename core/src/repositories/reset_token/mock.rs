//! Mock implementation of ResetTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::DomainError;

use super::traits::ResetTokenRepository;

/// Mock reset token repository keyed by token hash
pub struct MockResetTokenRepository {
    tokens: Arc<RwLock<HashMap<String, ResetToken>>>,
    unavailable: AtomicBool,
}

impl MockResetTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored tokens belonging to `user_id`
    pub async fn count_for_user(&self, user_id: Uuid) -> usize {
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .count()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "mock reset token store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockResetTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResetTokenRepository for MockResetTokenRepository {
    async fn insert(&self, token: ResetToken) -> Result<(), DomainError> {
        self.check_available()?;
        self.tokens
            .write()
            .await
            .insert(token.token_hash.clone(), token);
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<ResetToken>, DomainError> {
        self.check_available()?;
        Ok(self.tokens.read().await.get(token_hash).cloned())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }
}

//! Mock implementation of RevokedTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::revoked_token::RevokedTokenRecord;
use crate::errors::DomainError;

use super::traits::RevokedTokenRepository;

/// Mock revoked token repository keyed by token id
pub struct MockRevokedTokenRepository {
    records: Arc<RwLock<HashMap<String, RevokedTokenRecord>>>,
    unavailable: AtomicBool,
}

impl MockRevokedTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of a stored record
    pub async fn get(&self, token_id: &str) -> Option<RevokedTokenRecord> {
        self.records.read().await.get(token_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "mock revocation store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRevokedTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevokedTokenRepository for MockRevokedTokenRepository {
    async fn insert(&self, record: RevokedTokenRecord) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.token_id) {
            return Ok(false);
        }
        records.insert(record.token_id.clone(), record);
        Ok(true)
    }

    async fn list_unexpired(&self, now: DateTime<Utc>) -> Result<Vec<RevokedTokenRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        let mut unexpired: Vec<_> = records
            .values()
            .filter(|r| r.expires_at > now)
            .cloned()
            .collect();
        unexpired.sort_by(|a, b| a.revoked_at.cmp(&b.revoked_at));
        Ok(unexpired)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at >= cutoff);
        Ok(before - records.len())
    }
}

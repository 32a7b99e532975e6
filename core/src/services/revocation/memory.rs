//! In-memory revocation cache for tests and local development

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::traits::RevocationCache;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Expiring map with switches to simulate outages and restarts
///
/// Expiry follows the tokio clock, so paused-time tests can advance past a
/// TTL without sleeping.
#[derive(Default)]
pub struct InMemoryRevocationCache {
    entries: RwLock<HashMap<String, Entry>>,
    unavailable: AtomicBool,
    reject_writes: AtomicBool,
}

impl InMemoryRevocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call with `CacheUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fail only `set`, leaving reads working
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Drops every entry, as a cache process restart would
    pub async fn flush(&self) {
        self.entries.write().await.clear();
    }

    /// Remaining lifetime of a live entry
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable {
                message: "in-memory cache offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RevocationCache for InMemoryRevocationCache {
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.check_available()?;
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(DomainError::CacheUnavailable {
                message: "in-memory cache rejected write".to_string(),
            });
        }

        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check_available()?;
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone()))
    }
}

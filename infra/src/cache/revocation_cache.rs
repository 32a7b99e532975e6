//! Redis-backed revocation cache
//!
//! Holds the token deny-list and the mirrored per-user token versions. Keys
//! are namespaced with the configured prefix, if any.

use std::time::Duration;

use async_trait::async_trait;
use tl_core::errors::DomainError;
use tl_core::services::RevocationCache;

use super::redis_client::RedisClient;

/// [`RevocationCache`] over a shared [`RedisClient`]
#[derive(Clone)]
pub struct RedisRevocationCache {
    client: RedisClient,
}

impl RedisRevocationCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        self.client.config().make_key(key)
    }
}

#[async_trait]
impl RevocationCache for RedisRevocationCache {
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(&self.key(key)).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        Ok(self.client.set_with_expiry(&self.key(key), value, ttl).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(&self.key(key)).await?)
    }
}

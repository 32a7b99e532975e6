//! Cache module for Redis-based caching
//!
//! Provides the Redis client with connection retry, and the revocation
//! cache that holds the token deny-list and mirrored token versions.

pub mod redis_client;
pub mod revocation_cache;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use revocation_cache::RedisRevocationCache;

// Re-export commonly used types
pub use tl_shared::CacheConfig;

//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the travel-list
//! backend. It provides concrete implementations of the storage and cache
//! contracts defined in `tl_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL repositories for users, revoked tokens and reset tokens using SQLx
//! - **Cache**: Redis client and the revocation cache built on it
//! - **Delivery**: Development delivery of password reset tokens
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)
//! - `mock-services`: Re-export in-memory implementations from `tl_core`

use tl_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and revocation cache
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Reset token delivery implementations
pub mod delivery;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Database(e) => DomainError::StoreUnavailable {
                message: e.to_string(),
            },
            InfrastructureError::Cache(e) => DomainError::CacheUnavailable {
                message: e.to_string(),
            },
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}

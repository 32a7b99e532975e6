//! Database module - MySQL implementations using SQLx
//!
//! This module provides the durable store for the auth subsystem:
//! - Connection pool management
//! - Repository implementations for users, revoked tokens and reset tokens
//! - Schema migrations under `migrations/`

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlResetTokenRepository, MySqlRevokedTokenRepository, MySqlUserRepository};

//! Shared configuration and common types for the travel list server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The JSON error response returned by every endpoint

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CleanupConfig, DatabaseConfig, Environment,
    LoggingConfig, ResetConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};

//! # Travel List Core
//!
//! Authentication and session revocation for the travel-list backend.
//! This crate contains domain entities, the signing key store, the token
//! authority, the password reset flow, repository and cache interfaces,
//! and error types. Storage and cache implementations live in `tl_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

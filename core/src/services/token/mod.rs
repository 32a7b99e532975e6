//! Token service module for session token management
//!
//! This module handles all token-related operations including:
//! - RS256 session token issuance and validation
//! - Single-token revocation through the deny-list
//! - Per-user token versions for logout everywhere
//! - Cache rehydration at startup
//! - Background cleanup of expired records

mod authority;
mod cleanup;
mod config;

#[cfg(test)]
mod tests;

pub use authority::{IssuedToken, RehydrateReport, TokenAuthority};
pub use cleanup::{CleanupResult, TokenCleanupService};
pub use config::TokenAuthorityConfig;
pub(crate) use config::token_lifetime;

//! Repository interfaces for the durable store.
//!
//! The relational store is the source of truth for users, token versions,
//! revoked token records and reset tokens. Implementations live in the
//! infrastructure crate; in-memory versions are available behind the
//! `mock-services` feature.

pub mod reset_token;
pub mod revoked_token;
pub mod user;

pub use reset_token::ResetTokenRepository;
pub use revoked_token::RevokedTokenRepository;
pub use user::UserRepository;

#[cfg(any(test, feature = "mock-services"))]
pub use reset_token::MockResetTokenRepository;
#[cfg(any(test, feature = "mock-services"))]
pub use revoked_token::MockRevokedTokenRepository;
#[cfg(any(test, feature = "mock-services"))]
pub use user::MockUserRepository;

//! Error types for signing keys, session tokens, accounts and password reset
//!
//! The variants carry the internal reason for a failure. They are logged but
//! the presentation layer collapses them into generic responses so callers
//! cannot learn which check rejected a token.

use thiserror::Error;

/// Signing key store errors
///
/// These are construction-time errors and are fatal to startup when the
/// issuance key cannot be resolved.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Key store I/O error at {path}: {message}")]
    StoreIo { path: String, message: String },

    #[error("Failed to parse signing key '{id}': {message}")]
    Parse { id: String, message: String },

    #[error("Signing key not found: {id}")]
    NotFound { id: String },

    #[error("Signing key already loaded: {id}")]
    AlreadyExists { id: String },
}

/// Session token errors
///
/// All validation variants surface to the end user as a plain 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token revoked")]
    Revoked,

    #[error("Token expired")]
    Expired,

    #[error("Stale token version")]
    StaleVersion,

    #[error("Token signing failed")]
    SigningFailed,
}

/// Account and credential errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account inactive")]
    AccountInactive,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Authentication required")]
    Unauthenticated,
}

/// Password reset token errors
///
/// Reported externally as a generic forbidden response so that token
/// existence is never confirmed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetError {
    #[error("Reset token not found")]
    TokenNotFound,

    #[error("Reset token expired")]
    TokenExpired,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid length for field: {field} (min: {min}, max: {max})")]
    InvalidLength { field: String, min: usize, max: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Duration out of range for field: {field}")]
    InvalidDuration { field: String },
}

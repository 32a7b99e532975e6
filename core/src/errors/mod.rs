//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AuthError, KeyError, ResetError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// The revocation cache could not be reached; validation fails closed
    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    /// The durable store could not be reached or rejected the write
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The request deadline passed before the operation completed
    #[error("Operation timed out")]
    Timeout,

    // Bridge to specific error types
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Reset(#[from] ResetError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DomainError {
    /// Stable machine-readable code for logs and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::CacheUnavailable { .. } => "CACHE_UNAVAILABLE",
            DomainError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            DomainError::Timeout => "TIMEOUT",
            DomainError::Key(KeyError::StoreIo { .. }) => "KEY_STORE_IO",
            DomainError::Key(KeyError::Parse { .. }) => "KEY_PARSE",
            DomainError::Key(KeyError::NotFound { .. }) => "KEY_NOT_FOUND",
            DomainError::Key(KeyError::AlreadyExists { .. }) => "KEY_ALREADY_EXISTS",
            DomainError::Token(TokenError::MalformedToken) => "MALFORMED_TOKEN",
            DomainError::Token(TokenError::InvalidSignature) => "INVALID_SIGNATURE",
            DomainError::Token(TokenError::Revoked) => "TOKEN_REVOKED",
            DomainError::Token(TokenError::Expired) => "TOKEN_EXPIRED",
            DomainError::Token(TokenError::StaleVersion) => "STALE_VERSION",
            DomainError::Token(TokenError::SigningFailed) => "SIGNING_FAILED",
            DomainError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            DomainError::Auth(AuthError::AccountInactive) => "ACCOUNT_INACTIVE",
            DomainError::Auth(AuthError::UserNotFound) => "USER_NOT_FOUND",
            DomainError::Auth(AuthError::UserAlreadyExists) => "USER_ALREADY_EXISTS",
            DomainError::Auth(AuthError::Unauthenticated) => "UNAUTHENTICATED",
            DomainError::Reset(ResetError::TokenNotFound) => "RESET_TOKEN_NOT_FOUND",
            DomainError::Reset(ResetError::TokenExpired) => "RESET_TOKEN_EXPIRED",
            DomainError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// True for failures caused by the token itself rather than infrastructure
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::Token(
                TokenError::MalformedToken
                    | TokenError::InvalidSignature
                    | TokenError::Revoked
                    | TokenError::Expired
                    | TokenError::StaleVersion
            )
        )
    }

    /// True for cache, store and deadline failures
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            DomainError::CacheUnavailable { .. }
                | DomainError::StoreUnavailable { .. }
                | DomainError::Timeout
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

//! Password policy and bcrypt hashing
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking
//! thread pool instead of an async worker.

use crate::errors::{DomainError, DomainResult, ValidationError};

/// Minimum length in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// bcrypt ignores everything past its first 72 input bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Checks the password length policy
///
/// The lower bound counts characters; the upper bound counts UTF-8 bytes so
/// that no accepted password is silently truncated by bcrypt.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::InvalidLength {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(())
}

pub async fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing task failed: {}", e),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {}", e),
        })
}

/// Verifies `password` against a bcrypt hash
///
/// A corrupt stored hash verifies as `false` rather than erroring, so it is
/// reported to the caller as bad credentials.
pub async fn verify_password(password: &str, hash: &str) -> DomainResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password verification task failed: {}", e),
        })
}

//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, KeyError, ResetError, TokenError};

#[test]
fn test_token_rejections_are_classified() {
    for error in [
        TokenError::MalformedToken,
        TokenError::InvalidSignature,
        TokenError::Revoked,
        TokenError::Expired,
        TokenError::StaleVersion,
    ] {
        let error = DomainError::from(error);
        assert!(error.is_token_rejection(), "{} should be a rejection", error.code());
        assert!(!error.is_infrastructure());
    }

    assert!(!DomainError::from(TokenError::SigningFailed).is_token_rejection());
}

#[test]
fn test_infrastructure_errors_are_not_rejections() {
    let errors = [
        DomainError::CacheUnavailable { message: "connection refused".to_string() },
        DomainError::StoreUnavailable { message: "pool timed out".to_string() },
        DomainError::Timeout,
    ];

    for error in errors {
        assert!(error.is_infrastructure());
        assert!(!error.is_token_rejection());
    }
}

#[test]
fn test_error_codes() {
    assert_eq!(DomainError::from(TokenError::StaleVersion).code(), "STALE_VERSION");
    assert_eq!(DomainError::from(ResetError::TokenExpired).code(), "RESET_TOKEN_EXPIRED");
    assert_eq!(DomainError::from(AuthError::AccountInactive).code(), "ACCOUNT_INACTIVE");
    assert_eq!(
        DomainError::from(KeyError::NotFound { id: "2026-01".to_string() }).code(),
        "KEY_NOT_FOUND"
    );
}

#[test]
fn test_key_error_messages_name_the_key() {
    let error = KeyError::Parse {
        id: "2026-01".to_string(),
        message: "invalid PEM".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("2026-01"));
    assert!(message.contains("invalid PEM"));
}

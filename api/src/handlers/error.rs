//! Mapping of domain errors to HTTP responses
//!
//! Token rejections all collapse into the same 401 body so a caller cannot
//! tell a revoked token from a forged or expired one. The precise reason is
//! logged by the token authority.

use std::fmt;

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use tl_core::domain::RequestContext;
use tl_core::errors::{AuthError, DomainError};
use tl_shared::{error_codes, ErrorResponse};

/// A domain error tagged with the request trace id
#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    trace_id: Option<String>,
}

impl ApiError {
    pub fn new(error: DomainError, ctx: &RequestContext) -> Self {
        Self {
            error,
            trace_id: Some(ctx.trace_id().to_string()),
        }
    }

    pub fn unauthenticated(ctx: &RequestContext) -> Self {
        Self::new(AuthError::Unauthenticated.into(), ctx)
    }

    pub fn domain_error(&self) -> &DomainError {
        &self.error
    }

    /// Status, error code and client-facing message
    fn describe(&self) -> (StatusCode, &'static str, String) {
        let error = &self.error;

        if error.is_token_rejection() {
            return (StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, "Authentication required".into());
        }

        match error {
            DomainError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                error_codes::UNAUTHORIZED,
                "Invalid email or password".into(),
            ),
            DomainError::Auth(AuthError::Unauthenticated | AuthError::UserNotFound) => (
                StatusCode::UNAUTHORIZED,
                error_codes::UNAUTHORIZED,
                "Authentication required".into(),
            ),
            DomainError::Auth(AuthError::AccountInactive) => (
                StatusCode::FORBIDDEN,
                error_codes::FORBIDDEN,
                "Account is inactive".into(),
            ),
            DomainError::Auth(AuthError::UserAlreadyExists) => (
                StatusCode::CONFLICT,
                error_codes::CONFLICT,
                "An account with this email already exists".into(),
            ),
            DomainError::Reset(_) => (
                StatusCode::FORBIDDEN,
                error_codes::FORBIDDEN,
                "Invalid or expired reset token".into(),
            ),
            DomainError::Validation(e) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, e.to_string())
            }
            DomainError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                error_codes::REQUEST_TIMEOUT,
                "Request timed out".into(),
            ),
            DomainError::CacheUnavailable { .. } | DomainError::StoreUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable".into(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "An internal error occurred".into(),
            ),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self {
            error,
            trace_id: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.describe().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code, message) = self.describe();
        let trace_id = self.trace_id.as_deref().unwrap_or("-");

        if status.is_server_error() {
            tracing::error!(trace_id, code = self.error.code(), error = %self.error, "Request failed");
        } else if status == StatusCode::REQUEST_TIMEOUT {
            tracing::warn!(trace_id, "Request deadline exceeded");
        } else {
            tracing::debug!(trace_id, code = self.error.code(), "Request rejected");
        }

        let mut body = ErrorResponse::new(code, message);
        if let Some(trace_id) = &self.trace_id {
            body = body.with_trace_id(trace_id.clone());
        }
        HttpResponse::build(status).json(body)
    }
}

/// Turns JSON body errors into the standard error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::BAD_REQUEST, message));
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tl_core::errors::{ResetError, TokenError, ValidationError};

    use super::*;

    fn status_of(error: DomainError) -> StatusCode {
        ApiError::from(error).status_code()
    }

    #[test]
    fn test_token_rejections_are_indistinguishable() {
        let bodies: Vec<_> = [
            TokenError::MalformedToken,
            TokenError::InvalidSignature,
            TokenError::Revoked,
            TokenError::Expired,
            TokenError::StaleVersion,
        ]
        .into_iter()
        .map(|e| {
            let (status, code, message) = ApiError::from(DomainError::from(e)).describe();
            (status, code, message)
        })
        .collect();

        assert!(bodies.iter().all(|b| b == &bodies[0]));
        assert_eq!(bodies[0].0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(ResetError::TokenExpired.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(ResetError::TokenNotFound.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AuthError::AccountInactive.into()), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AuthError::UserAlreadyExists.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(DomainError::Timeout), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            status_of(DomainError::CacheUnavailable { message: "down".into() }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(DomainError::StoreUnavailable { message: "down".into() }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(ValidationError::InvalidEmail.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(TokenError::SigningFailed.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_infrastructure_detail_is_not_exposed() {
        let ctx = RequestContext::new("trace-9", Duration::from_secs(1));
        let error = ApiError::new(
            DomainError::StoreUnavailable { message: "mysql at 10.0.0.5 refused".into() },
            &ctx,
        );
        let (_, _, message) = error.describe();
        assert!(!message.contains("10.0.0.5"));
    }
}

use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::{MessageResponse, ResetRequest, ResetSubmitRequest};
use crate::handlers::ApiError;
use crate::middleware::RequestScope;

/// Same body whether or not the email belongs to an account
const RESET_REQUESTED: &str = "If an account exists for this email, a reset link has been sent";

/// Handler for POST /api/v1/auth/password-reset/request
///
/// Always answers 202 for well-formed requests so that account existence is
/// not revealed.
pub async fn request_reset(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    body: web::Json<ResetRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .reset_service
        .request_reset(&ctx, &body.email)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Accepted().json(MessageResponse::new(RESET_REQUESTED)))
}

/// Handler for POST /api/v1/auth/password-reset/submit
///
/// ## Errors
/// - 400 Bad Request: New password outside policy
/// - 403 Forbidden: Unknown, used or expired reset token
pub async fn submit_reset(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    body: web::Json<ResetSubmitRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .reset_service
        .submit_reset(&ctx, &body.token, &body.new_password)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password has been reset")))
}

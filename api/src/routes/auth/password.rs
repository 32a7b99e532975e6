use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::{ChangePasswordRequest, TokenResponse};
use crate::handlers::ApiError;
use crate::middleware::Authenticated;

/// Handler for POST /api/v1/auth/password
///
/// Changes the password, invalidates every existing session and returns a
/// fresh token for the caller.
///
/// ## Errors
/// - 400 Bad Request: New password outside policy
/// - 401 Unauthorized: Current password wrong, or token invalid
pub async fn change_password(
    state: web::Data<AppState>,
    Authenticated(ctx): Authenticated,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let issued = state
        .auth_service
        .change_password(&ctx, &body.current_password, &body.new_password)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(issued)))
}

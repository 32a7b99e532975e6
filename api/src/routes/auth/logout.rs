use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::MessageResponse;
use crate::handlers::ApiError;
use crate::middleware::Authenticated;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the bearer token used for this request. Other sessions of the
/// same user stay valid.
pub async fn logout(
    state: web::Data<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<HttpResponse, ApiError> {
    state
        .auth_service
        .logout(&ctx)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")))
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Invalidates every token issued to the caller so far, including the one
/// used for this request.
pub async fn logout_all(
    state: web::Data<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<HttpResponse, ApiError> {
    state
        .auth_service
        .logout_all(&ctx)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out of all sessions")))
}

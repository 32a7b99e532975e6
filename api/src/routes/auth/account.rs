use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::handlers::ApiError;
use crate::middleware::Authenticated;

/// Handler for DELETE /api/v1/auth/account
///
/// Soft-deletes the caller's account and invalidates all of its tokens.
pub async fn delete_account(
    state: web::Data<AppState>,
    Authenticated(ctx): Authenticated,
) -> Result<HttpResponse, ApiError> {
    state
        .auth_service
        .delete_account(&ctx)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::NoContent().finish())
}

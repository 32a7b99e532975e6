use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::{CredentialsRequest, TokenResponse};
use crate::handlers::ApiError;
use crate::middleware::RequestScope;

/// Handler for POST /api/v1/auth/login
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ…",
///     "token_type": "Bearer",
///     "expires_in": 3600,
///     "expires_at": "2026-01-01T01:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown email or wrong password
/// - 403 Forbidden: Account inactive
pub async fn login(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, ApiError> {
    let issued = state
        .auth_service
        .login(&ctx, &body.email, &body.password)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(issued)))
}

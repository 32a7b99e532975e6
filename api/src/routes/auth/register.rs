use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::{CredentialsRequest, RegisterResponse};
use crate::handlers::ApiError;
use crate::middleware::RequestScope;

/// Handler for POST /api/v1/auth/register
///
/// ## Success (201 Created)
/// ```json
/// { "user_id": "…", "email": "ana@example.com" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid email or password outside policy
/// - 409 Conflict: Email already registered
pub async fn register(
    state: web::Data<AppState>,
    RequestScope(ctx): RequestScope,
    body: web::Json<CredentialsRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .auth_service
        .register(&ctx, &body.email, &body.password)
        .await
        .map_err(|e| ApiError::new(e, &ctx))?;

    Ok(HttpResponse::Created().json(RegisterResponse::from(user)))
}

//! Application state and factory

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpResponse};
use tl_core::services::{AuthService, PasswordResetService, TokenAuthority};
use tl_shared::{error_codes, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::json_error_handler;
use crate::middleware::SessionAuth;
use crate::routes::auth::{account, login, logout, password, password_reset, register};

/// Services shared by every worker
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub auth_service: Arc<AuthService>,
    pub reset_service: Arc<PasswordResetService>,
    /// Deadline applied to each request's cache and store calls
    pub request_timeout: Duration,
    /// Maximum accepted JSON body in bytes
    pub max_payload_size: usize,
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(app_state.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::register))
                    .route("/login", web::post().to(login::login))
                    .route(
                        "/logout",
                        web::post().to(logout::logout).wrap(SessionAuth::new()),
                    )
                    .route(
                        "/logout-all",
                        web::post().to(logout::logout_all).wrap(SessionAuth::new()),
                    )
                    .route(
                        "/password",
                        web::post()
                            .to(password::change_password)
                            .wrap(SessionAuth::new()),
                    )
                    .route(
                        "/account",
                        web::delete()
                            .to(account::delete_account)
                            .wrap(SessionAuth::new()),
                    )
                    .route(
                        "/password-reset/request",
                        web::post().to(password_reset::request_reset),
                    )
                    .route(
                        "/password-reset/submit",
                        web::post().to(password_reset::submit_reset),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports the key used for new tokens; a missing key means the instance
/// cannot issue and is reported unhealthy.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let keys = state.authority.key_store();

    match keys.signing_key_id() {
        Ok(signing_key_id) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "service": "travel-list-auth",
            "version": env!("CARGO_PKG_VERSION"),
            "signing_key_id": signing_key_id,
            "active_key_ids": keys.active_key_ids(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "Health check found no signing key");
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
                error_codes::SERVICE_UNAVAILABLE,
                "No signing key available",
            ))
        }
    }
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

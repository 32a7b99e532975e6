//! Bearer token authentication middleware.
//!
//! Builds the request context (trace id and deadline), validates the bearer
//! token through the token authority and stores the context, now carrying
//! the validated claims, in the request extensions. Handlers receive it
//! through the [`Authenticated`] extractor.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Duration,
};
use tl_core::domain::RequestContext;
use uuid::Uuid;

use crate::app::AppState;
use crate::handlers::ApiError;

/// Header carrying a caller-supplied trace id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Longest caller-supplied trace id that is accepted as-is
const MAX_REQUEST_ID_LEN: usize = 128;

/// Deadline used when no application state is registered
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds a fresh context for `req`
///
/// The trace id comes from `X-Request-Id` when present and sane, otherwise a
/// new UUID. The deadline is `timeout` from now.
pub fn request_context(req: &HttpRequest, timeout: Duration) -> RequestContext {
    let trace_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    RequestContext::new(trace_id, timeout)
}

fn request_timeout(req: &HttpRequest) -> Duration {
    req.app_data::<web::Data<AppState>>()
        .map(|state| state.request_timeout)
        .unwrap_or(FALLBACK_TIMEOUT)
}

/// Authentication middleware factory for protected routes
#[derive(Default)]
pub struct SessionAuth;

impl SessionAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication middleware service
pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let ctx = request_context(req.request(), request_timeout(req.request()));

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!(trace_id = %ctx.trace_id(), "Application state not registered");
                let error = ApiError::new(
                    tl_core::errors::DomainError::Internal {
                        message: "application state missing".to_string(),
                    },
                    &ctx,
                );
                return Ok(req.into_response(error.error_response()).map_into_right_body());
            };

            let Some(token) = extract_bearer_token(&req) else {
                let error = ApiError::unauthenticated(&ctx);
                return Ok(req.into_response(error.error_response()).map_into_right_body());
            };

            match state.authority.validate(&ctx, &token).await {
                Ok(claims) => {
                    req.extensions_mut().insert(ctx.with_claims(claims));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => {
                    let error = ApiError::new(e, &ctx);
                    Ok(req.into_response(error.error_response()).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Extractor for the context of an authenticated caller
pub struct Authenticated(pub RequestContext);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .filter(|ctx| ctx.claims().is_some())
            .cloned();

        let result = match ctx {
            Some(ctx) => Ok(Authenticated(ctx)),
            None => {
                let ctx = request_context(req, request_timeout(req));
                Err(ApiError::unauthenticated(&ctx).into())
            }
        };

        ready(result)
    }
}

/// Extractor for the context of any request, authenticated or not
pub struct RequestScope(pub RequestContext);

impl FromRequest for RequestScope {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| request_context(req, request_timeout(req)));

        ready(Ok(RequestScope(ctx)))
    }
}

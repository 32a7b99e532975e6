//! Request-scoped context passed explicitly into every core operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::entities::claims::Claims;
use crate::errors::{AuthError, DomainError, DomainResult};

/// Deadline used for startup and background work that has no caller
pub const BACKGROUND_DEADLINE: Duration = Duration::from_secs(60);

/// Per-request context carrying the trace id, the caller's deadline and,
/// once authenticated, the validated claims.
///
/// Every cache and store call made on behalf of a request is bounded by
/// [`RequestContext::run`], so a slow dependency surfaces as
/// [`DomainError::Timeout`] instead of an authentication verdict.
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: String,
    deadline: Instant,
    claims: Option<Claims>,
}

impl RequestContext {
    /// Creates a context whose deadline is `timeout` from now
    pub fn new(trace_id: impl Into<String>, timeout: Duration) -> Self {
        Self::with_deadline(trace_id, Instant::now() + timeout)
    }

    pub fn with_deadline(trace_id: impl Into<String>, deadline: Instant) -> Self {
        Self {
            trace_id: trace_id.into(),
            deadline,
            claims: None,
        }
    }

    /// Context for startup and janitor work, with a generated trace id
    pub fn background() -> Self {
        Self::new(format!("bg-{}", Uuid::new_v4()), BACKGROUND_DEADLINE)
    }

    /// Returns a copy carrying validated claims
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// Claims of the authenticated caller, or `Unauthenticated`
    pub fn require_claims(&self) -> DomainResult<&Claims> {
        self.claims
            .as_ref()
            .ok_or(DomainError::Auth(AuthError::Unauthenticated))
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Runs `operation` under the request deadline
    pub async fn run<T, F>(&self, operation: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        tokio::time::timeout_at(self.deadline, operation)
            .await
            .map_err(|_| DomainError::Timeout)?
    }
}

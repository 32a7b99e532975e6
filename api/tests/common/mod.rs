//! Shared fixtures for API integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use tl_api::AppState;
use tl_core::domain::RequestContext;
use tl_core::repositories::{MockResetTokenRepository, MockRevokedTokenRepository, MockUserRepository};
use tl_core::services::{
    AuthService, AuthServiceConfig, InMemoryRevocationCache, KeyStore, PasswordResetService,
    RecordingResetDelivery, SigningKey, TokenAuthority, TokenAuthorityConfig,
};
use tl_shared::ResetConfig;

pub const KEY_2026_01: &str = include_str!("../../../core/tests/fixtures/keys/2026-01.pem");

pub const PASSWORD: &str = "correct horse battery";

/// In-memory backends behind a fully wired application state
pub struct TestApp {
    pub state: web::Data<AppState>,
    pub cache: Arc<InMemoryRevocationCache>,
    pub users: Arc<MockUserRepository>,
    pub revoked_tokens: Arc<MockRevokedTokenRepository>,
    pub delivery: Arc<RecordingResetDelivery>,
}

impl TestApp {
    pub fn new() -> Self {
        let keys = KeyStore::new();
        keys.add(SigningKey::from_pem("2026-01", KEY_2026_01.as_bytes()).unwrap()).unwrap();

        let cache = Arc::new(InMemoryRevocationCache::new());
        let users = Arc::new(MockUserRepository::new());
        let revoked_tokens = Arc::new(MockRevokedTokenRepository::new());
        let reset_tokens = Arc::new(MockResetTokenRepository::new());
        let delivery = Arc::new(RecordingResetDelivery::new());

        let authority = Arc::new(TokenAuthority::new(
            Arc::new(keys),
            cache.clone(),
            users.clone(),
            revoked_tokens.clone(),
            TokenAuthorityConfig::default(),
        ));
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            authority.clone(),
            AuthServiceConfig {
                bcrypt_cost: 4,
                ..AuthServiceConfig::default()
            },
        ));
        let reset_service = Arc::new(PasswordResetService::new(
            users.clone(),
            reset_tokens,
            authority.clone(),
            delivery.clone(),
            ResetConfig::default(),
            4,
        ));

        let state = web::Data::new(AppState {
            authority,
            auth_service,
            reset_service,
            request_timeout: Duration::from_secs(5),
            max_payload_size: 64 * 1024,
        });

        Self {
            state,
            cache,
            users,
            revoked_tokens,
            delivery,
        }
    }

    /// Registers an account with [`PASSWORD`]
    pub async fn register(&self, email: &str) {
        let ctx = RequestContext::new("fixture", Duration::from_secs(5));
        self.state
            .auth_service
            .register(&ctx, email, PASSWORD)
            .await
            .unwrap();
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

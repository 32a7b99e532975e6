//! Shared fixtures for service tests

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::user::User;
use crate::domain::value_objects::RequestContext;
use crate::repositories::{MockResetTokenRepository, MockRevokedTokenRepository, MockUserRepository};
use crate::services::key_store::{KeyStore, SigningKey};
use crate::services::revocation::InMemoryRevocationCache;
use crate::services::token::{TokenAuthority, TokenAuthorityConfig};

pub const KEY_2026_01: &str = include_str!("../../tests/fixtures/keys/2026-01.pem");
pub const KEY_2026_07: &str = include_str!("../../tests/fixtures/keys/2026-07.pem");

/// Minimum bcrypt cost, keeps tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn ctx() -> RequestContext {
    RequestContext::new("test-trace", Duration::from_secs(5))
}

pub fn roles(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn key_store_with(ids: &[(&str, &str)]) -> Arc<KeyStore> {
    let store = KeyStore::new();
    for (id, pem) in ids {
        store
            .add(SigningKey::from_pem(*id, pem.as_bytes()).unwrap())
            .unwrap();
    }
    Arc::new(store)
}

/// Token authority wired to in-memory collaborators
pub struct Harness {
    pub keys: Arc<KeyStore>,
    pub cache: Arc<InMemoryRevocationCache>,
    pub users: Arc<MockUserRepository>,
    pub revoked_tokens: Arc<MockRevokedTokenRepository>,
    pub reset_tokens: Arc<MockResetTokenRepository>,
    pub authority: Arc<TokenAuthority>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(TokenAuthorityConfig::default())
    }

    pub fn with_config(config: TokenAuthorityConfig) -> Self {
        let keys = key_store_with(&[("2026-01", KEY_2026_01)]);
        let cache = Arc::new(InMemoryRevocationCache::new());
        let users = Arc::new(MockUserRepository::new());
        let revoked_tokens = Arc::new(MockRevokedTokenRepository::new());
        let reset_tokens = Arc::new(MockResetTokenRepository::new());
        let authority = Arc::new(TokenAuthority::new(
            keys.clone(),
            cache.clone(),
            users.clone(),
            revoked_tokens.clone(),
            config,
        ));

        Self {
            keys,
            cache,
            users,
            revoked_tokens,
            reset_tokens,
            authority,
        }
    }

    /// Seeds an active user whose password is `password`
    pub async fn seed_user(&self, email: &str, password: &str) -> User {
        let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
        let user = User::new(email, hash);
        self.users.insert_user(user.clone()).await;
        user
    }
}

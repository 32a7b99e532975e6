use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;

use tl_api::startup::{rehydrate_revocations, RehydrationPolicy};
use tl_api::telemetry::init_tracing;
use tl_api::{create_app, AppState};
use tl_core::repositories::{ResetTokenRepository, RevokedTokenRepository, UserRepository};
use tl_core::services::{
    AuthService, AuthServiceConfig, KeyStore, PasswordResetService, TokenAuthority,
    TokenAuthorityConfig, TokenCleanupService,
};
use tl_infra::cache::{RedisClient, RedisRevocationCache};
use tl_infra::database::{
    DatabasePool, MySqlResetTokenRepository, MySqlRevokedTokenRepository, MySqlUserRepository,
};
use tl_infra::delivery::LogResetDelivery;
use tl_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting travel list auth API");

    let db = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to MySQL")?;
    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to Redis")?;

    // A missing or unparsable issuance key is fatal
    let keys = KeyStore::load_dir(&config.auth.keys_dir)
        .with_context(|| format!("failed to load signing keys from {}", config.auth.keys_dir))?;
    if let Some(id) = &config.auth.signing_key_id {
        keys.set_signing_key_id(id.clone());
    }
    let signing_key = keys
        .validate_signing_key()
        .context("no usable signing key")?;
    info!(kid = signing_key.id(), "Signing key ready");

    let pool = db.get_pool().clone();
    let users: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.clone()));
    let revoked_tokens: Arc<dyn RevokedTokenRepository> =
        Arc::new(MySqlRevokedTokenRepository::new(pool.clone()));
    let reset_tokens: Arc<dyn ResetTokenRepository> =
        Arc::new(MySqlResetTokenRepository::new(pool));

    let authority = Arc::new(TokenAuthority::new(
        Arc::new(keys),
        Arc::new(RedisRevocationCache::new(redis)),
        users.clone(),
        revoked_tokens.clone(),
        TokenAuthorityConfig::from(&config.auth),
    ));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        authority.clone(),
        AuthServiceConfig::from(&config.auth),
    ));
    let reset_service = Arc::new(PasswordResetService::new(
        users,
        reset_tokens.clone(),
        authority.clone(),
        Arc::new(LogResetDelivery::new(config.environment.is_development())),
        config.auth.reset.clone(),
        config.auth.bcrypt_cost,
    ));

    // Revoked tokens would validate against a cold deny-list
    if let Err(e) = rehydrate_revocations(&authority, &RehydrationPolicy::default()).await {
        db.close().await;
        return Err(e);
    }

    let janitor = Arc::new(TokenCleanupService::new(
        revoked_tokens,
        reset_tokens,
        config.auth.cleanup.clone(),
    ))
    .start_background_task();

    let state = web::Data::new(AppState {
        authority,
        auth_service,
        reset_service,
        request_timeout: Duration::from_millis(config.auth.request_timeout_ms),
        max_payload_size: config.server.max_payload_size,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(handle) = janitor {
        handle.abort();
    }
    db.close().await;
    info!("Server stopped");

    Ok(())
}

//! Application builder — wires state, services, and the router together.

use std::sync::Arc;

use userhub_auth::jwt::{JwtDecoder, JwtEncoder};
use userhub_auth::password::PasswordHasher;
use userhub_auth::session::manager::SessionManager;
use userhub_auth::session::store::RefreshTokenStore;
use userhub_cache::provider::CacheManager;
use userhub_core::config::AppConfig;
use userhub_core::error::AppError;
use userhub_database::connection::DatabasePool;
use userhub_database::repositories::user::{UserRepository, UserStore};
use userhub_service::user::service::UserService;

use crate::router::build_router;
use crate::state::AppState;

/// Runs the UserHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    tracing::info!("Starting UserHub server...");

    // Cache
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // Repositories
    let user_store: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));

    // Auth
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let token_store = Arc::new(RefreshTokenStore::new(
        Arc::clone(&cache),
        config.auth.refresh_ttl_days,
    ));
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&jwt_encoder),
        Arc::clone(&user_store),
        Arc::clone(&password_hasher),
        Arc::clone(&token_store),
    ));

    // Services
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_store),
        Arc::clone(&password_hasher),
        Arc::clone(&cache),
        config.cache.user_ttl_seconds,
        config.auth.password_min_length,
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
        cache,
        jwt_decoder,
        session_manager,
        user_service,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("UserHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
    tracing::info!("Shutdown signal received");
}

//! Application state shared across all handlers.

use std::sync::Arc;

use userhub_auth::jwt::decoder::JwtDecoder;
use userhub_auth::session::manager::SessionManager;
use userhub_cache::provider::CacheManager;
use userhub_core::config::AppConfig;
use userhub_database::connection::DatabasePool;
use userhub_service::user::service::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool wrapper.
    pub db: Arc<DatabasePool>,
    /// Cache manager (Redis or in-memory).
    pub cache: Arc<CacheManager>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// User CRUD service.
    pub user_service: Arc<UserService>,
}

//! Session lifecycle manager — login, refresh, and logout flows.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_database::repositories::user::UserStore;
use userhub_entity::user::User;

use crate::jwt::JwtEncoder;
use crate::password::PasswordHasher;
use crate::session::store::RefreshTokenStore;
use crate::session::token::generate_refresh_token;

/// An access token and its companion refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Opaque refresh token.
    pub refresh_token: String,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: User,
}

/// Manages the session lifecycle around token issuance.
#[derive(Debug, Clone)]
pub struct SessionManager {
    jwt_encoder: Arc<JwtEncoder>,
    user_store: Arc<dyn UserStore>,
    password_hasher: Arc<PasswordHasher>,
    token_store: Arc<RefreshTokenStore>,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        user_store: Arc<dyn UserStore>,
        password_hasher: Arc<PasswordHasher>,
        token_store: Arc<RefreshTokenStore>,
    ) -> Self {
        Self {
            jwt_encoder,
            user_store,
            password_hasher,
            token_store,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Look up the user by username
    /// 2. Verify the password against the stored hash
    /// 3. Issue an access token and a fresh refresh token
    /// 4. Persist the refresh token in the cache
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let user = self
            .user_store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::authentication("password incorrect"));
        }

        let tokens = self.issue_tokens(&user).await?;

        info!(user_id = user.id, username = %user.username, "Login successful");
        Ok(LoginResult { tokens, user })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated; it stays valid until it
    /// expires or is revoked by logout.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(String, DateTime<Utc>)> {
        let user_id = self
            .token_store
            .lookup(refresh_token)
            .await?
            .ok_or_else(|| AppError::authentication("refresh token is invalid or expired"))?;

        // The user may have been deleted since the token was issued.
        let user = self
            .user_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("refresh token is invalid or expired"))?;

        let (access_token, expires_at) = self.jwt_encoder.issue(user.id, &user.username)?;

        info!(user_id = user.id, "Access token refreshed");
        Ok((access_token, expires_at))
    }

    /// Revokes a refresh token.
    ///
    /// Logout is lenient: an unknown token or a cache failure does not
    /// fail the request, it only gets logged.
    pub async fn logout(&self, refresh_token: &str) {
        if let Err(e) = self.token_store.revoke(refresh_token).await {
            warn!(error = %e, "Failed to revoke refresh token during logout");
        }
    }

    /// Issues a fresh token pair for the user and stores the refresh token.
    pub async fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let (access_token, access_expires_at) = self.jwt_encoder.issue(user.id, &user.username)?;

        let refresh_token = generate_refresh_token();
        self.token_store.put(&refresh_token, user.id).await?;

        let refresh_ttl = Duration::from_std(self.token_store.ttl())
            .map_err(|e| AppError::internal(format!("refresh TTL out of range: {e}")))?;

        Ok(TokenPair {
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at: Utc::now() + refresh_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use userhub_cache::memory::MemoryCacheProvider;
    use userhub_cache::provider::CacheManager;
    use userhub_core::config::AuthConfig;
    use userhub_core::config::cache::MemoryCacheConfig;
    use userhub_core::error::ErrorKind;
    use userhub_entity::user::model::{CreateUser, UpdateUser};

    use super::*;
    use crate::jwt::JwtDecoder;

    /// In-memory [`UserStore`] holding a fixed set of accounts.
    #[derive(Debug, Default)]
    struct StubUserStore {
        users: Mutex<Vec<User>>,
    }

    impl StubUserStore {
        fn with_user(user: User) -> Self {
            Self {
                users: Mutex::new(vec![user]),
            }
        }
    }

    #[async_trait]
    impl UserStore for StubUserStore {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| u.id == id && !u.is_deleted())
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| u.username == username && !u.is_deleted())
                .cloned())
        }

        async fn create(&self, _data: &CreateUser) -> AppResult<User> {
            Err(AppError::internal("not used in these tests"))
        }

        async fn update(&self, _data: &UpdateUser) -> AppResult<User> {
            Err(AppError::internal("not used in these tests"))
        }

        async fn soft_delete(&self, _id: i64) -> AppResult<()> {
            Err(AppError::internal("not used in these tests"))
        }
    }

    fn test_user(hasher: &PasswordHasher, password: &str) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: hasher.hash_password(password).unwrap(),
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_manager(store: StubUserStore) -> (SessionManager, Arc<JwtDecoder>) {
        let config = AuthConfig {
            jwt_secret: "test-secret-key-for-unit-tests".to_string(),
            ..AuthConfig::default()
        };
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }, 60);
        let cache = Arc::new(CacheManager::from_provider(Arc::new(provider)));
        let manager = SessionManager::new(
            Arc::new(JwtEncoder::new(&config)),
            Arc::new(store),
            Arc::new(PasswordHasher::new()),
            Arc::new(RefreshTokenStore::new(cache, config.refresh_ttl_days)),
        );
        (manager, Arc::new(JwtDecoder::new(&config)))
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_tokens() {
        let hasher = PasswordHasher::new();
        let (manager, decoder) = make_manager(StubUserStore::with_user(test_user(&hasher, "hunter2!")));

        let result = manager.login("alice", "hunter2!").await.unwrap();

        let claims = decoder.decode(&result.tokens.access_token).unwrap();
        assert_eq!(claims.user_id(), 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(result.tokens.refresh_token.len(), 64);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_not_found() {
        let (manager, _) = make_manager(StubUserStore::default());

        let err = manager.login("nobody", "whatever").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "user not found");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_authentication_error() {
        let hasher = PasswordHasher::new();
        let (manager, _) = make_manager(StubUserStore::with_user(test_user(&hasher, "hunter2!")));

        let err = manager.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "password incorrect");
    }

    #[tokio::test]
    async fn test_refresh_returns_new_access_token() {
        let hasher = PasswordHasher::new();
        let (manager, decoder) = make_manager(StubUserStore::with_user(test_user(&hasher, "hunter2!")));

        let result = manager.login("alice", "hunter2!").await.unwrap();
        let (access_token, _) = manager.refresh(&result.tokens.refresh_token).await.unwrap();

        let claims = decoder.decode(&access_token).unwrap();
        assert_eq!(claims.user_id(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_logout_is_rejected() {
        let hasher = PasswordHasher::new();
        let (manager, _) = make_manager(StubUserStore::with_user(test_user(&hasher, "hunter2!")));

        let result = manager.login("alice", "hunter2!").await.unwrap();
        manager.logout(&result.tokens.refresh_token).await;

        let err = manager.refresh(&result.tokens.refresh_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "refresh token is invalid or expired");
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token_is_rejected() {
        let (manager, _) = make_manager(StubUserStore::default());

        let err = manager.refresh("never-issued").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_logout_unknown_token_still_succeeds() {
        let (manager, _) = make_manager(StubUserStore::default());
        // Lenient by design: no panic, no error surfaced.
        manager.logout("never-issued").await;
        manager.logout("never-issued").await;
    }
}

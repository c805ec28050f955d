//! User registration and CRUD operations.
//!
//! Reads go through the cache (cache-aside); every write to a user row
//! evicts that user's cache entry so the next read repopulates it from
//! the database.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use userhub_auth::password::PasswordHasher;
use userhub_cache::keys;
use userhub_cache::provider::CacheManager;
use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::cache::CacheProvider;
use userhub_database::repositories::user::UserStore;
use userhub_entity::user::User;
use userhub_entity::user::model::{CreateUser, UpdateUser};

/// Fields a caller may change on an existing user.
///
/// The password arrives in plaintext; hashing happens here, never in
/// the repository.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New username, if changing.
    pub username: Option<String>,
    /// New email, if changing.
    pub email: Option<String>,
    /// New plaintext password, if changing.
    pub password: Option<String>,
}

impl UpdateUserInput {
    /// Returns true when the input changes nothing.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Handles user registration and CRUD.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User store.
    user_store: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Cache manager.
    cache: Arc<CacheManager>,
    /// TTL for cached user entities.
    user_ttl: Duration,
    /// Minimum accepted password length, from `AuthConfig`.
    password_min_length: usize,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        cache: Arc<CacheManager>,
        user_ttl_seconds: u64,
        password_min_length: usize,
    ) -> Self {
        Self {
            user_store,
            hasher,
            cache,
            user_ttl: Duration::from_secs(user_ttl_seconds),
            password_min_length,
        }
    }

    /// Registers a new user.
    ///
    /// The username pre-check gives a friendly conflict error; the
    /// partial unique index in the database closes the race between
    /// concurrent registrations.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        self.check_password_length(password)?;

        if self
            .user_store
            .find_by_username(username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("username already exists"));
        }

        let password_hash = self.hasher.hash_password(password)?;

        let user = self
            .user_store
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Fetches a user by ID, serving from the cache when possible.
    ///
    /// Cache failures degrade to a database read instead of failing the
    /// request.
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        let cache_key = keys::user_by_id(id);

        match self.cache.get_json::<User>(&cache_key).await {
            Ok(Some(user)) => {
                debug!(user_id = id, "User served from cache");
                return Ok(user);
            }
            Ok(None) => {}
            Err(e) => warn!(user_id = id, error = %e, "Cache read failed, falling back to database"),
        }

        let user = self
            .user_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        if let Err(e) = self.cache.set_json(&cache_key, &user, self.user_ttl).await {
            warn!(user_id = id, error = %e, "Failed to cache user");
        }

        Ok(user)
    }

    /// Applies a partial update to a user.
    ///
    /// A new password is re-hashed here before it reaches the
    /// repository. The cache entry is evicted after the write.
    pub async fn update_user(&self, id: i64, input: UpdateUserInput) -> AppResult<User> {
        if input.is_empty() {
            return Err(AppError::validation("no fields to update"));
        }

        let password_hash = match &input.password {
            Some(password) => {
                self.check_password_length(password)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .user_store
            .update(&UpdateUser {
                id,
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        self.evict(id).await;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Soft-deletes a user and evicts its cache entry.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.user_store.soft_delete(id).await?;
        self.evict(id).await;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    fn check_password_length(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.password_min_length {
            return Err(AppError::validation(format!(
                "password must be at least {} characters",
                self.password_min_length
            )));
        }
        Ok(())
    }

    /// Best-effort cache eviction. The entry would expire on its own
    /// anyway, so failures are only logged.
    async fn evict(&self, id: i64) {
        let cache_key = keys::user_by_id(id);
        if let Err(e) = self.cache.delete(&cache_key).await {
            warn!(user_id = id, error = %e, "Failed to evict user from cache");
        }
    }
}

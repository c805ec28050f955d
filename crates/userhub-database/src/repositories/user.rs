//! User repository implementation.
//!
//! Deletion is a soft delete: rows keep their data and get `deleted_at`
//! stamped. Every read and write here filters on `deleted_at IS NULL`,
//! so a deleted account behaves exactly like a missing one.

use async_trait::async_trait;
use sqlx::PgPool;

use userhub_core::error::{AppError, ErrorKind};
use userhub_core::result::AppResult;
use userhub_entity::user::User;
use userhub_entity::user::model::{CreateUser, UpdateUser};

/// Name of the partial unique index on active usernames.
const USERNAME_UNIQUE_INDEX: &str = "users_username_active_key";

/// Persistence operations on user accounts.
///
/// The services depend on this trait rather than the concrete Postgres
/// repository, so tests can substitute an in-memory store.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key, excluding soft-deleted rows.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by username, excluding soft-deleted rows.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new user. A duplicate active username is a conflict.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial update, returning the updated row.
    async fn update(&self, data: &UpdateUser) -> AppResult<User>;

    /// Soft-delete a user. Absent or already-deleted rows are a typed
    /// not-found.
    async fn soft_delete(&self, id: i64) -> AppResult<()>;
}

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
        })
    }

    /// The partial unique index on active usernames is the atomic backstop
    /// for the service-level pre-check; a violation maps to a conflict.
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(USERNAME_UNIQUE_INDEX) =>
            {
                AppError::conflict(format!("Username '{}' already exists", data.username))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// `fetch_optional` distinguishes found from not-found explicitly
    /// instead of inferring it from an affected-rows count.
    async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET username = COALESCE($2, username), \
                              email = COALESCE($3, email), \
                              password_hash = COALESCE($4, password_hash), \
                              updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(data.id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(USERNAME_UNIQUE_INDEX) =>
            {
                AppError::conflict("Username already exists".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update user", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", data.id)))
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        Ok(())
    }
}

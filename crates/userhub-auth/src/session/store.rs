//! Refresh token persistence in the cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use userhub_cache::keys;
use userhub_cache::provider::CacheManager;
use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::cache::CacheProvider;

/// Stores refresh tokens as cache entries mapping token -> user ID.
///
/// A token is valid exactly as long as its cache entry exists. Expiry
/// and revocation are both just entry removal.
#[derive(Debug, Clone)]
pub struct RefreshTokenStore {
    cache: Arc<CacheManager>,
    ttl: Duration,
}

impl RefreshTokenStore {
    /// Create a store with the given refresh token lifetime in days.
    pub fn new(cache: Arc<CacheManager>, refresh_ttl_days: u64) -> Self {
        Self {
            cache,
            ttl: Duration::from_secs(refresh_ttl_days * 24 * 60 * 60),
        }
    }

    /// The configured refresh token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Persist a refresh token for the given user.
    pub async fn put(&self, token: &str, user_id: i64) -> AppResult<()> {
        let key = keys::refresh_token(token);
        self.cache
            .set(&key, &user_id.to_string(), self.ttl)
            .await?;
        debug!(user_id, "Stored refresh token");
        Ok(())
    }

    /// Resolve a refresh token to the user it was issued for.
    ///
    /// Returns `None` for unknown, expired, or revoked tokens.
    pub async fn lookup(&self, token: &str) -> AppResult<Option<i64>> {
        let key = keys::refresh_token(token);
        match self.cache.get(&key).await? {
            Some(raw) => {
                let user_id = raw.parse::<i64>().map_err(|_| {
                    AppError::cache(format!("corrupt refresh token entry: {raw:?}"))
                })?;
                Ok(Some(user_id))
            }
            None => Ok(None),
        }
    }

    /// Remove a refresh token, invalidating it immediately.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        let key = keys::refresh_token(token);
        self.cache.delete(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userhub_cache::memory::MemoryCacheProvider;
    use userhub_core::config::cache::MemoryCacheConfig;

    fn make_store() -> RefreshTokenStore {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }, 60);
        let cache = Arc::new(CacheManager::from_provider(Arc::new(provider)));
        RefreshTokenStore::new(cache, 7)
    }

    #[tokio::test]
    async fn test_put_and_lookup() {
        let store = make_store();
        store.put("abc123", 42).await.unwrap();
        assert_eq!(store.lookup("abc123").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_lookup_unknown_token() {
        let store = make_store();
        assert_eq!(store.lookup("never-issued").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke() {
        let store = make_store();
        store.put("abc123", 42).await.unwrap();
        store.revoke("abc123").await.unwrap();
        assert_eq!(store.lookup("abc123").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke_unknown_token_is_ok() {
        let store = make_store();
        store.revoke("never-issued").await.unwrap();
    }

    #[test]
    fn test_ttl_in_seconds() {
        let store = make_store();
        assert_eq!(store.ttl(), Duration::from_secs(7 * 24 * 60 * 60));
    }
}

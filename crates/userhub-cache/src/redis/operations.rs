//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use userhub_core::error::{AppError, ErrorKind};
use userhub_core::result::AppResult;
use userhub_core::traits::cache::CacheProvider;

use super::client::RedisClient;
use crate::keys;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    /// Redis client.
    client: RedisClient,
    /// Default TTL.
    default_ttl: Duration,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient, default_ttl_seconds: u64) -> Self {
        Self {
            client,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

/// KEYS patterns covering this application's entries.
///
/// With a configured prefix every application key matches `{prefix}*`.
/// Without one, `*` would match keys belonging to other tenants of the
/// same Redis, so the scan is restricted to the known namespaces.
fn flush_patterns(prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        keys::ALL_NAMESPACES
            .iter()
            .map(|ns| format!("{ns}*"))
            .collect()
    } else {
        vec![format!("{prefix}*")]
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&full_key, value, ttl.as_secs())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_default(&self, key: &str, value: &str) -> AppResult<()> {
        self.set(key, value, self.default_ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }

    async fn flush_all(&self) -> AppResult<()> {
        // Only flush this application's keys, not the entire Redis.
        let mut conn = self.client.conn_mut();
        let mut count = 0usize;

        for pattern in flush_patterns(self.client.prefix()) {
            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(&pattern)
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;

            count += keys.len();
            for key in &keys {
                let _: () = conn.del(key).await.map_err(Self::map_err)?;
            }
        }

        debug!(count, "Flushed cache keys");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_patterns_with_prefix() {
        assert_eq!(flush_patterns("userhub:"), vec!["userhub:*"]);
    }

    #[test]
    fn test_flush_patterns_without_prefix_never_matches_everything() {
        let patterns = flush_patterns("");
        assert!(!patterns.iter().any(|p| p == "*"));
        assert!(patterns.contains(&"user:*".to_string()));
        assert!(patterns.contains(&"refresh_token:*".to_string()));
    }
}

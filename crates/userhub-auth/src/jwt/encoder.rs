//! JWT access token encoding.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::debug;

use userhub_core::config::AuthConfig;
use userhub_core::error::AppError;
use userhub_core::result::AppResult;

use super::claims::Claims;

/// Issues signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Create an encoder from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            access_ttl: Duration::minutes(config.jwt_access_ttl_minutes as i64),
        }
    }

    /// Issue an access token for the given user.
    ///
    /// Returns the signed token together with its expiration time.
    pub fn issue(&self, user_id: i64, username: &str) -> AppResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("failed to sign access token: {e}")))?;

        debug!(user_id, %expires_at, "Issued access token");
        Ok((token, expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-key-for-unit-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_issue_produces_three_segments() {
        let encoder = JwtEncoder::new(&test_config());
        let (token, expires_at) = encoder.issue(42, "alice").unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert!(expires_at > Utc::now());
    }
}

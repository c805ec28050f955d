//! JWT access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind as JwtErrorKind};

use userhub_core::config::AuthConfig;
use userhub_core::error::AppError;
use userhub_core::result::AppResult;

use super::claims::Claims;

/// Validates access tokens and extracts their claims.
///
/// Rejections distinguish expired tokens from otherwise invalid ones so
/// callers can surface the difference to clients.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder").finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Create a decoder from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return its claims.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => {
                    AppError::authentication("access token has expired")
                }
                JwtErrorKind::InvalidSignature => {
                    AppError::authentication("invalid token signature")
                }
                JwtErrorKind::InvalidIssuer => AppError::authentication("invalid token issuer"),
                _ => AppError::authentication("invalid access token"),
            }
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;
    use crate::jwt::encoder::JwtEncoder;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-key-for-unit-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let (token, _) = encoder.issue(7, "alice").unwrap();
        let claims = decoder.decode(&token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, config.jwt_issuer);
    }

    #[test]
    fn test_expired_token_rejected_with_expired_message() {
        let config = test_config();
        let decoder = JwtDecoder::new(&config);

        // Well past the validation leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            iss: config.jwt_issuer.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims, &config.jwt_secret);

        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.message, "access token has expired");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let decoder = JwtDecoder::new(&config);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            iss: config.jwt_issuer.clone(),
            iat: now,
            exp: now + 900,
        };
        let token = sign(&claims, "a-different-secret");

        assert!(decoder.decode(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let config = test_config();
        let decoder = JwtDecoder::new(&config);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            iss: "someone-else".to_string(),
            iat: now,
            exp: now + 900,
        };
        let token = sign(&claims, &config.jwt_secret);

        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.message, "invalid token issuer");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let decoder = JwtDecoder::new(&test_config());
        assert!(decoder.decode("not-a-jwt").is_err());
    }
}

//! `AuthUser` extractor — pulls the JWT from the Authorization header and validates it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use userhub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller identity, available to protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token's subject claim.
    pub user_id: i64,
    /// Username from the token.
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(AppError::authentication("missing authorization header")))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError(AppError::authentication(
                "authorization header must be a bearer token",
            ))
        })?;

        // Decode errors distinguish expired from invalid tokens.
        let claims = state.jwt_decoder.decode(token)?;

        Ok(AuthUser {
            user_id: claims.user_id(),
            username: claims.username,
        })
    }
}

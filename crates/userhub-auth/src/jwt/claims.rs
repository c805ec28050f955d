//! JWT claims structure embedded in access tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT claims payload embedded in every access token.
///
/// Access tokens are stateless: nothing here is looked up server-side
/// after signature verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: i64,
    /// Username for convenience.
    pub username: String,
    /// Issuer of the token.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired() {
        let now = Utc::now().timestamp();
        let live = Claims {
            sub: 1,
            username: "alice".to_string(),
            iss: "userhub".to_string(),
            iat: now,
            exp: now + 900,
        };
        assert!(!live.is_expired());

        let stale = Claims { exp: now - 900, ..live };
        assert!(stale.is_expired());
    }
}

//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    /// Plaintext password. Minimum length is enforced by the user
    /// service from `AuthConfig::password_min_length`.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    pub refresh_token: String,
}

/// Partial user update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username.
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: Option<String>,
    /// New email.
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    /// New plaintext password. Minimum length is enforced by the user
    /// service from `AuthConfig::password_min_length`.
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_password = RegisterRequest {
            password: String::new(),
            ..valid
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_update_request_none_fields_pass_validation() {
        let empty = UpdateUserRequest {
            username: None,
            email: None,
            password: None,
        };
        assert!(empty.validate().is_ok());
    }
}

//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user account.
///
/// Deleted accounts are retained as rows with `deleted_at` set; every
/// repository query filters them out.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name (among non-deleted users).
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    /// Soft-delete marker. `Some` means the account is deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Data for a partial update of an existing user.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// The user ID to update.
    pub id: i64,
    /// New username.
    pub username: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New pre-hashed password.
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Returns true when no field is set, i.e. the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_deserialize_without_password_hash() {
        // Cached copies were serialized without the hash; they must still parse.
        let json = r#"{
            "id": 7,
            "username": "bob",
            "email": "bob@example.com",
            "deleted_at": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.password_hash.is_empty());
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_update_user_is_empty() {
        let update = UpdateUser {
            id: 1,
            username: None,
            email: None,
            password_hash: None,
        };
        assert!(update.is_empty());

        let update = UpdateUser {
            email: Some("new@example.com".to_string()),
            ..update
        };
        assert!(!update.is_empty());
    }
}

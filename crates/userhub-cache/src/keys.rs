//! Cache key builders for all UserHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Namespace for user entity keys.
pub const USER_NAMESPACE: &str = "user:";

/// Namespace for refresh token keys.
pub const REFRESH_TOKEN_NAMESPACE: &str = "refresh_token:";

/// Every namespace the application writes under. `flush_all` on a
/// prefix-less Redis provider scans these instead of `*`.
pub const ALL_NAMESPACES: &[&str] = &[USER_NAMESPACE, REFRESH_TOKEN_NAMESPACE];

/// Cache key for a user entity by ID.
pub fn user_by_id(user_id: i64) -> String {
    format!("{USER_NAMESPACE}{user_id}")
}

/// Cache key mapping an opaque refresh token to its user ID.
pub fn refresh_token(token: &str) -> String {
    format!("{REFRESH_TOKEN_NAMESPACE}{token}")
}

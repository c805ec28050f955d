//! # userhub-auth
//!
//! Authentication building blocks for UserHub: Argon2id password hashing,
//! HS256 access tokens, opaque refresh tokens, and the session flows
//! (login, refresh, logout) that combine them.

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use session::{RefreshTokenStore, SessionManager, TokenPair};

//! Session flows: refresh token storage, login, refresh, logout.

pub mod manager;
pub mod store;
pub mod token;

pub use manager::{LoginResult, SessionManager, TokenPair};
pub use store::RefreshTokenStore;
pub use token::generate_refresh_token;

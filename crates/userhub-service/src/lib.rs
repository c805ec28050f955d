//! # userhub-service
//!
//! Business logic for UserHub: user registration and the CRUD
//! operations behind the user endpoints, with cache-aside reads.

pub mod user;

pub use user::{UpdateUserInput, UserService};

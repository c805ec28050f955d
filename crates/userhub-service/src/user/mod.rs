//! User registration and CRUD.

pub mod service;

pub use service::{UpdateUserInput, UserService};

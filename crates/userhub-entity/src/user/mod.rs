//! User entity and write models.

pub mod model;

pub use model::{CreateUser, UpdateUser, User};

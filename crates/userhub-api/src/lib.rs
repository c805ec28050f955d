//! # userhub-api
//!
//! HTTP API layer for UserHub built on Axum.
//!
//! Provides the REST endpoints, request/response DTOs, the `AuthUser`
//! extractor, and the mapping from domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use state::AppState;

//! # portico-api
//!
//! HTTP API layer for Portico built on Axum.
//!
//! Provides the REST endpoints, the `AuthUser` extractor, the RBAC
//! guard, DTOs, and the `ApiError` wrapper mapping domain errors to
//! HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

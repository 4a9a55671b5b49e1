//! HTTP API for the DLMM liquidity advisor.
//!
//! Exposes pool recommendations, bin-range candidates, balance validation and
//! streamed chat answers to a web UI.

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// OpenAPI documentation.
pub mod openapi;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use error::ApiError;
pub use openapi::ApiDoc;
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;

//! Axum HTTP API server for the recruitment dashboard.
//!
//! This crate provides:
//! - Screen handlers returning plain data bags for the dashboard pages
//! - Access-code session gating with a 24 hour expiry window
//! - Security headers, CORS and request logging middleware
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use security::{MemoryStore, SessionGuard, SessionStore};
pub use state::AppState;

//! HTTP API layer with Axum routes and extractors.
//!
//! This crate provides:
//! - REST API routes
//! - Multipart request extractors
//! - Error and response types

pub mod error;
pub mod extractors;
pub mod responses;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use atrium_core::user::UserService;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User account operations.
    pub users: Arc<UserService>,
}

/// HTTP limits applied to every route.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Upper bound for handling one request.
    pub request_timeout: Duration,
    /// Maximum accepted request body in bytes.
    pub body_limit: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit: 6 * 1024 * 1024,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(options.body_limit))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

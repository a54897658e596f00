//! HTTP API layer for cinema-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: catalog, comments, votes, auth and settings routes
//! - **Extractors**: authenticated user, staff/superuser guards, session ID
//! - **Middleware**: JWT authentication, anonymous session cookies
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
pub use middleware::AppState;

/// Assemble the full application: routes plus the auth and session layers.
///
/// Handlers rely on the layers to populate request extensions, so every
/// deployment (and every integration test) goes through this function
/// rather than [`router`] directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::session_middleware))
        .with_state(state)
}

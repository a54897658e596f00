//! API endpoints.

mod auth;
mod comments;
mod films;
mod links;
mod people;
mod settings;
mod taxonomy;
mod users;

use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/films", films::router())
        .nest("/comments", comments::router())
        .nest("/links", links::router())
        .nest("/genres", taxonomy::genres_router())
        .nest("/collections", taxonomy::collections_router())
        .nest("/countries", taxonomy::countries_router())
        .nest("/languages", taxonomy::languages_router())
        .nest("/actors", people::actors_router())
        .nest("/directors", people::directors_router())
        .nest("/meta", settings::router())
}

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// Common pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Pagination {
    /// The page size, capped at the server maximum.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

const fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Pagination plus a free-text search filter.
///
/// Kept flat because the query-string deserializer cannot flatten
/// nested structs.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl SearchQuery {
    /// The page size, capped at the server maximum.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            search: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

//! Download link endpoints addressed by link ID.
//!
//! Creation and listing live under `/films/{id}/links`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use cinema_common::AppResult;
use cinema_core::{CreateLinkInput, LinkWithLanguages, UpdateLinkInput};
use cinema_db::{entities::link, repositories::LinkQuery};
use serde::Deserialize;

use crate::{
    extractors::StaffUser,
    middleware::AppState,
    response::{ApiResponse, Page, ok},
};

use super::default_limit;

/// Flat listing filters; flat because the query-string deserializer
/// cannot flatten nested structs.
#[derive(Debug, Deserialize)]
pub struct LinkListQuery {
    pub film: Option<String>,
    pub quality: Option<link::Quality>,
    pub subtitle: Option<link::Subtitle>,
    pub size_gte: Option<i32>,
    pub size_lte: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Filtered listing across all films, newest first (staff operation).
async fn list(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<LinkListQuery>,
) -> AppResult<ApiResponse<Page<link::Model>>> {
    let filter = LinkQuery {
        film_id: query.film,
        quality: query.quality,
        subtitle: query.subtitle,
        size_gte: query.size_gte,
        size_lte: query.size_lte,
    };

    let (items, total) = state
        .link_service
        .list(&filter, query.limit.min(super::MAX_PAGE_SIZE), query.offset)
        .await?;
    Ok(ApiResponse::ok(Page { items, total }))
}

/// Flat create request: the nested route takes the film from the path,
/// this one takes it from the body.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub film_id: String,
    #[serde(flatten)]
    pub link: CreateLinkInput,
}

/// Add a download link (staff operation).
async fn create(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> AppResult<ApiResponse<link::Model>> {
    let link = state.link_service.create(&req.film_id, req.link).await?;
    Ok(ApiResponse::created(link))
}

/// Get a single link with its languages (staff operation).
async fn show(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LinkWithLanguages>> {
    let link = state.link_service.get(&id).await?;
    Ok(ApiResponse::ok(link))
}

/// Update a link (staff operation).
async fn update(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLinkInput>,
) -> AppResult<ApiResponse<link::Model>> {
    let link = state.link_service.update(&id, input).await?;
    Ok(ApiResponse::ok(link))
}

/// Delete a link (staff operation).
async fn remove(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.link_service.delete(&id).await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(remove))
}

//! Actor and director endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use cinema_common::AppResult;
use cinema_core::PersonInput;
use cinema_db::entities::{actor, director};

use crate::{
    extractors::StaffUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};

use super::SearchQuery;

async fn list_actors(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<actor::Model>>> {
    let actors = state
        .actor_service
        .list(query.search.as_deref(), query.limit(), query.offset)
        .await?;
    Ok(ApiResponse::ok(actors))
}

async fn create_actor(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<PersonInput>,
) -> AppResult<ApiResponse<actor::Model>> {
    let actor = state.actor_service.create(input).await?;
    Ok(ApiResponse::created(actor))
}

async fn show_actor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<actor::Model>> {
    let actor = state.actor_service.get(&id).await?;
    Ok(ApiResponse::ok(actor))
}

async fn update_actor(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PersonInput>,
) -> AppResult<ApiResponse<actor::Model>> {
    let actor = state.actor_service.update(&id, input).await?;
    Ok(ApiResponse::ok(actor))
}

async fn remove_actor(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.actor_service.delete(&id).await?;
    Ok(ok())
}

pub fn actors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_actors).post(create_actor))
        .route(
            "/{id}",
            get(show_actor).patch(update_actor).delete(remove_actor),
        )
}

async fn list_directors(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<director::Model>>> {
    let directors = state
        .director_service
        .list(query.search.as_deref(), query.limit(), query.offset)
        .await?;
    Ok(ApiResponse::ok(directors))
}

async fn create_director(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<PersonInput>,
) -> AppResult<ApiResponse<director::Model>> {
    let director = state.director_service.create(input).await?;
    Ok(ApiResponse::created(director))
}

async fn show_director(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<director::Model>> {
    let director = state.director_service.get(&id).await?;
    Ok(ApiResponse::ok(director))
}

async fn update_director(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PersonInput>,
) -> AppResult<ApiResponse<director::Model>> {
    let director = state.director_service.update(&id, input).await?;
    Ok(ApiResponse::ok(director))
}

/// Refuses with 409 while any film still references the director.
async fn remove_director(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.director_service.delete(&id).await?;
    Ok(ok())
}

pub fn directors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_directors).post(create_director))
        .route(
            "/{id}",
            get(show_director)
                .patch(update_director)
                .delete(remove_director),
        )
}

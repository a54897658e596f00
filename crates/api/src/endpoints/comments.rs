//! Comment moderation, editing and voting endpoints.
//!
//! Creation and listing live under `/films/{id}/comments`; everything
//! addressed by comment ID lives here.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use cinema_common::{AppResult, VoteKind};
use cinema_core::{ModerateCommentInput, UpdateCommentInput};
use cinema_db::{entities::comment, repositories::CommentQuery};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, SessionId, StaffUser},
    middleware::AppState,
    response::{ApiResponse, Page, ok},
};

use super::{Pagination, default_limit};

/// Flat listing filters; flat because the query-string deserializer
/// cannot flatten nested structs.
#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub status: Option<comment::CommentStatus>,
    pub rating: Option<i16>,
    pub user: Option<String>,
    pub film: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Filtered listing across all films, newest first (staff operation).
async fn list(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> AppResult<ApiResponse<Page<comment::Model>>> {
    let filter = CommentQuery {
        status: query.status,
        rating: query.rating,
        user_id: query.user,
        film_id: query.film,
        search: query.search,
    };

    let (items, total) = state
        .comment_service
        .list(&filter, query.limit.min(super::MAX_PAGE_SIZE), query.offset)
        .await?;
    Ok(ApiResponse::ok(Page { items, total }))
}

/// The moderation queue: pending comments, oldest first (staff operation).
async fn pending(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<comment::Model>>> {
    let comments = state
        .comment_service
        .list_pending(page.limit(), page.offset)
        .await?;
    Ok(ApiResponse::ok(comments))
}

/// Edit a comment. Only the author may edit.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state.comment_service.update(&id, &user.id, input).await?;
    Ok(ApiResponse::ok(comment))
}

/// Delete a comment. The author or staff may delete.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .comment_service
        .delete(&id, &user.id, user.is_staff)
        .await?;
    Ok(ok())
}

/// Approve or reject a pending comment (staff operation).
async fn moderate(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ModerateCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state.comment_service.moderate(&id, &input).await?;
    Ok(ApiResponse::ok(comment))
}

/// Like a comment. One vote of each kind per session per comment.
async fn like(
    session: SessionId,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .vote(&session.0, &id, VoteKind::Like)
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Dislike a comment. One vote of each kind per session per comment.
async fn dislike(
    session: SessionId,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .vote(&session.0, &id, VoteKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(comment))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/pending", get(pending))
        .route("/{id}", patch(update).delete(remove))
        .route("/{id}/moderate", post(moderate))
        .route("/{id}/like", post(like))
        .route("/{id}/dislike", post(dislike))
}

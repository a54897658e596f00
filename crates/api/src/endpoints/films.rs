//! Film catalog endpoints, with nested comment and link routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use cinema_common::{AppResult, VoteKind};
use cinema_core::{
    CommentTree, CreateCommentInput, CreateFilmInput, CreateLinkInput, FilmDetail,
    LinkWithLanguages, UpdateCommentInput, UpdateFilmInput,
};
use cinema_db::{
    entities::{comment, film, link},
    repositories::{CommentViewer, FilmOrder, FilmQuery},
};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser, SessionId, StaffUser},
    middleware::AppState,
    response::{ApiResponse, Page, ok},
};

use super::default_limit;

/// Film listing filters. All filters are conjunctive; flat because the
/// query-string deserializer cannot flatten nested structs.
#[derive(Debug, Deserialize)]
pub struct FilmListQuery {
    /// Only honored for staff; everyone else sees published films.
    pub status: Option<film::FilmStatus>,
    pub year: Option<i16>,
    pub year_gte: Option<i16>,
    pub year_lt: Option<i16>,
    pub rating_gte: Option<f64>,
    pub rating_lt: Option<f64>,
    pub is_serial: Option<bool>,
    /// Films having at least one link with this subtitle variant.
    pub subtitle: Option<link::Subtitle>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub collection: Option<String>,
    pub actor: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub order: FilmOrder,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl From<FilmListQuery> for FilmQuery {
    fn from(q: FilmListQuery) -> Self {
        Self {
            status: q.status,
            year: q.year,
            year_gte: q.year_gte,
            year_lt: q.year_lt,
            rating_gte: q.rating_gte,
            rating_lt: q.rating_lt,
            is_serial: q.is_serial,
            subtitle: q.subtitle,
            director_id: q.director,
            genre_id: q.genre,
            collection_id: q.collection,
            actor_id: q.actor,
            country_id: q.country,
            language_id: q.language,
            search: q.search,
            order: q.order,
        }
    }
}

/// List films with filtering, ordering and pagination.
async fn list(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<FilmListQuery>,
) -> AppResult<ApiResponse<Page<film::Model>>> {
    let staff = viewer.is_staff();
    let limit = query.limit.min(super::MAX_PAGE_SIZE);
    let offset = query.offset;

    let (items, total) = state
        .film_service
        .list(query.into(), staff, limit, offset)
        .await?;

    Ok(ApiResponse::ok(Page { items, total }))
}

/// Create a film (staff operation).
async fn create(
    StaffUser(user): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFilmInput>,
) -> AppResult<ApiResponse<film::Model>> {
    let film = state.film_service.create(&user.id, input).await?;
    Ok(ApiResponse::created(film))
}

/// Get a film with its full related graph. Counts the visit once per
/// visitor per dedup window.
async fn show(
    viewer: MaybeAuthUser,
    session: SessionId,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FilmDetail>> {
    let staff = viewer.is_staff();

    // Logged-in visitors dedup by account, everyone else by session.
    let visitor = viewer
        .0
        .map_or(session.0, |u| u.id);

    let detail = state
        .film_service
        .get_detail(&id, Some(&visitor), staff)
        .await?;
    Ok(ApiResponse::ok(detail))
}

/// Update a film (staff operation).
async fn update(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFilmInput>,
) -> AppResult<ApiResponse<film::Model>> {
    let film = state.film_service.update(&id, input).await?;
    Ok(ApiResponse::ok(film))
}

/// Delete a film (staff operation).
async fn remove(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.film_service.delete(&id).await?;
    Ok(ok())
}

fn comment_viewer(viewer: &MaybeAuthUser) -> CommentViewer {
    match &viewer.0 {
        Some(user) if user.is_staff => CommentViewer::Staff,
        Some(user) => CommentViewer::User(user.id.clone()),
        None => CommentViewer::Anonymous,
    }
}

/// The comment tree of a film, filtered to what the viewer may see.
async fn list_comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentTree>>> {
    let tree = state
        .comment_service
        .list_for_film(&id, &comment_viewer(&viewer))
        .await?;
    Ok(ApiResponse::ok(tree))
}

/// Post a comment on a film. It enters the moderation queue as pending.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state.comment_service.create(&id, &user.id, input).await?;
    Ok(ApiResponse::created(comment))
}

/// Get a single comment on a film, subject to the same visibility
/// rules as the tree listing.
async fn show_comment(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path((film_id, comment_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<comment::Model>> {
    let comment = state
        .comment_service
        .get_for_film(&film_id, &comment_id, &comment_viewer(&viewer))
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Edit a comment on a film. Only the author may edit.
async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((film_id, comment_id)): Path<(String, String)>,
    Json(input): Json<UpdateCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let viewer = CommentViewer::User(user.id.clone());
    state
        .comment_service
        .get_for_film(&film_id, &comment_id, &viewer)
        .await?;

    let comment = state
        .comment_service
        .update(&comment_id, &user.id, input)
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Delete a comment on a film. The author or staff may delete.
async fn remove_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((film_id, comment_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let viewer = if user.is_staff {
        CommentViewer::Staff
    } else {
        CommentViewer::User(user.id.clone())
    };
    state
        .comment_service
        .get_for_film(&film_id, &comment_id, &viewer)
        .await?;

    state
        .comment_service
        .delete(&comment_id, &user.id, user.is_staff)
        .await?;
    Ok(ok())
}

/// Like a comment on a film. One vote of each kind per session per comment.
async fn like_comment(
    viewer: MaybeAuthUser,
    session: SessionId,
    State(state): State<AppState>,
    Path((film_id, comment_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<comment::Model>> {
    state
        .comment_service
        .get_for_film(&film_id, &comment_id, &comment_viewer(&viewer))
        .await?;

    let comment = state
        .comment_service
        .vote(&session.0, &comment_id, VoteKind::Like)
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// Dislike a comment on a film. One vote of each kind per session per comment.
async fn dislike_comment(
    viewer: MaybeAuthUser,
    session: SessionId,
    State(state): State<AppState>,
    Path((film_id, comment_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<comment::Model>> {
    state
        .comment_service
        .get_for_film(&film_id, &comment_id, &comment_viewer(&viewer))
        .await?;

    let comment = state
        .comment_service
        .vote(&session.0, &comment_id, VoteKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(comment))
}

/// List the download links of a film.
async fn list_links(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<LinkWithLanguages>>> {
    // Draft films stay hidden from non-staff, links included.
    state.film_service.get(&id, viewer.is_staff()).await?;

    let links = state.link_service.list_for_film(&id).await?;
    Ok(ApiResponse::ok(links))
}

/// Add a download link to a film (staff operation).
async fn create_link(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateLinkInput>,
) -> AppResult<ApiResponse<link::Model>> {
    let link = state.link_service.create(&id, input).await?;
    Ok(ApiResponse::created(link))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(remove))
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route(
            "/{id}/comments/{cid}",
            get(show_comment).patch(update_comment).delete(remove_comment),
        )
        .route("/{id}/comments/{cid}/like", post(like_comment))
        .route("/{id}/comments/{cid}/dislike", post(dislike_comment))
        .route("/{id}/links", get(list_links).post(create_link))
}

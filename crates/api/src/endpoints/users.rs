//! User account endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use cinema_common::AppResult;
use cinema_core::{CreateUserInput, UpdateProfileInput, UpdateUserInput};
use cinema_db::entities::user;
use serde::Serialize;

use crate::{
    extractors::{AuthUser, SuperUser},
    middleware::AppState,
    response::{ApiResponse, ok},
};

use super::Pagination;

/// User response. Leaves out the password hash and internal flags the
/// caller has no business seeing.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        let display_name = user.display_name();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            display_name,
            is_staff: user.is_staff,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Get the calling user's own account.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<UserResponse> {
    ApiResponse::ok(user.into())
}

/// Update the calling user's own profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&user.id, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// List user accounts (superuser operation).
async fn list(
    SuperUser(_): SuperUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list(page.limit(), page.offset).await?;
    Ok(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Create a user account directly (superuser operation). The account
/// goes through the same validation as self-registration; staff flags
/// are granted afterwards via update.
async fn create(
    SuperUser(_): SuperUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.register(input).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Get a user account by ID (superuser operation).
async fn show(
    SuperUser(_): SuperUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Update a user account (superuser operation).
async fn update(
    SuperUser(_): SuperUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update_user(&id, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Delete a user account (superuser operation).
async fn remove(
    SuperUser(_): SuperUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.user_service.delete(&id).await?;
    Ok(ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(remove))
}

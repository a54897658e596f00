//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use cinema_common::{AppError, AppResult, TokenKind, TokenPair};
use cinema_core::{CreateUserInput, LoginInput};
use cinema_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Register response.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Create a new user account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let user = state.user_service.register(input).await?;

    Ok(ApiResponse::created(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

/// Token response: the access/refresh pair.
#[derive(Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

/// Exchange username/password credentials for a token pair.
async fn token(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let user = state.user_service.authenticate(&input).await?;
    let pair = state.token_manager.issue_pair(&user.id)?;

    Ok(ApiResponse::ok(pair.into()))
}

/// Refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Exchange a refresh token for a fresh pair.
///
/// The account is re-checked so a deactivated user cannot keep rotating
/// tokens.
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let claims = state
        .token_manager
        .verify(&req.refresh, TokenKind::Refresh)?;

    let user: user::Model = state.user_service.get(&claims.sub).await?;
    if !user.is_active {
        return Err(AppError::Unauthorized);
    }

    let pair = state.token_manager.issue_pair(&user.id)?;
    Ok(ApiResponse::ok(pair.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/refresh", post(refresh))
}

//! Site settings endpoints.

use axum::{Json, Router, extract::State, routing::get};
use cinema_common::AppResult;
use cinema_core::UpdateSiteSettingsInput;
use cinema_db::entities::site_settings;

use crate::{extractors::StaffUser, middleware::AppState, response::ApiResponse};

/// Get the site settings. The singleton row is created on first access.
async fn show(State(state): State<AppState>) -> AppResult<ApiResponse<site_settings::Model>> {
    let settings = state.site_settings_service.get().await?;
    Ok(ApiResponse::ok(settings))
}

/// Update the site settings (staff operation).
async fn update(
    StaffUser(_): StaffUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateSiteSettingsInput>,
) -> AppResult<ApiResponse<site_settings::Model>> {
    let settings = state.site_settings_service.update(input).await?;
    Ok(ApiResponse::ok(settings))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).patch(update))
}

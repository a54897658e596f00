//! Taxonomy endpoints: genres, collections, countries and languages.
//!
//! The four resources share one route shape, so one macro produces the
//! four routers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use cinema_common::AppResult;
use cinema_core::TaxonomyInput;

use crate::{
    extractors::StaffUser,
    middleware::AppState,
    response::{ApiResponse, ok},
};

use super::SearchQuery;

macro_rules! taxonomy_routes {
    ($router:ident, $module:ident, $service:ident) => {
        mod $module {
            use super::*;
            use cinema_db::entities::$module;

            pub async fn list(
                State(state): State<AppState>,
                Query(query): Query<SearchQuery>,
            ) -> AppResult<ApiResponse<Vec<$module::Model>>> {
                let items = state
                    .$service
                    .list(query.search.as_deref(), query.limit(), query.offset)
                    .await?;
                Ok(ApiResponse::ok(items))
            }

            pub async fn create(
                StaffUser(_): StaffUser,
                State(state): State<AppState>,
                Json(input): Json<TaxonomyInput>,
            ) -> AppResult<ApiResponse<$module::Model>> {
                let item = state.$service.create(input).await?;
                Ok(ApiResponse::created(item))
            }

            pub async fn show(
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> AppResult<ApiResponse<$module::Model>> {
                let item = state.$service.get(&id).await?;
                Ok(ApiResponse::ok(item))
            }

            pub async fn update(
                StaffUser(_): StaffUser,
                State(state): State<AppState>,
                Path(id): Path<String>,
                Json(input): Json<TaxonomyInput>,
            ) -> AppResult<ApiResponse<$module::Model>> {
                let item = state.$service.update(&id, input).await?;
                Ok(ApiResponse::ok(item))
            }

            pub async fn remove(
                StaffUser(_): StaffUser,
                State(state): State<AppState>,
                Path(id): Path<String>,
            ) -> AppResult<impl IntoResponse> {
                state.$service.delete(&id).await?;
                Ok(ok())
            }
        }

        pub fn $router() -> Router<AppState> {
            Router::new()
                .route("/", get($module::list).post($module::create))
                .route(
                    "/{id}",
                    get($module::show)
                        .patch($module::update)
                        .delete($module::remove),
                )
        }
    };
}

taxonomy_routes!(genres_router, genre, genre_service);
taxonomy_routes!(collections_router, collection, collection_service);
taxonomy_routes!(countries_router, country, country_service);
taxonomy_routes!(languages_router, language, language_service);

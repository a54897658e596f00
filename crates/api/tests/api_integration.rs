//! API integration tests.
//!
//! Each test wires the full router and middleware stack over a mock
//! database scripted for that request.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinema_api::{AppState, app};
use cinema_common::{MemoryVisitTracker, MemoryVoteRegistry, TokenManager};
use cinema_core::{
    ActorService, CollectionService, CommentService, CountryService, DirectorService, FilmService,
    GenreService, LanguageService, LinkService, SiteSettingsService, UserService,
};
use cinema_db::entities::user;
use cinema_db::repositories::{
    ActorRepository, CollectionRepository, CommentRepository, CountryRepository,
    DirectorRepository, FilmRepository, GenreRepository, LanguageRepository, LinkRepository,
    SiteSettingsRepository, UserRepository,
};
use cinema_db::test_utils::{test_comment, test_site_settings, test_user};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use tower::ServiceExt;

/// Build app state where every repository shares the given mock database.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let film_repo = FilmRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let link_repo = LinkRepository::new(Arc::clone(&db));
    let genre_repo = GenreRepository::new(Arc::clone(&db));
    let collection_repo = CollectionRepository::new(Arc::clone(&db));
    let country_repo = CountryRepository::new(Arc::clone(&db));
    let language_repo = LanguageRepository::new(Arc::clone(&db));
    let actor_repo = ActorRepository::new(Arc::clone(&db));
    let director_repo = DirectorRepository::new(Arc::clone(&db));
    let settings_repo = SiteSettingsRepository::new(Arc::clone(&db));

    let visit_tracker = Arc::new(MemoryVisitTracker::new());
    let vote_registry = Arc::new(MemoryVoteRegistry::new());

    AppState {
        user_service: UserService::new(user_repo),
        film_service: FilmService::new(
            film_repo.clone(),
            director_repo.clone(),
            genre_repo.clone(),
            collection_repo.clone(),
            actor_repo.clone(),
            country_repo.clone(),
            language_repo.clone(),
            visit_tracker,
        ),
        comment_service: CommentService::new(comment_repo, film_repo.clone(), vote_registry),
        link_service: LinkService::new(link_repo, film_repo.clone(), language_repo.clone()),
        genre_service: GenreService::new(genre_repo),
        collection_service: CollectionService::new(collection_repo),
        country_service: CountryService::new(country_repo),
        language_service: LanguageService::new(language_repo),
        actor_service: ActorService::new(actor_repo),
        director_service: DirectorService::new(director_repo, film_repo),
        site_settings_service: SiteSettingsService::new(settings_repo),
        token_manager: TokenManager::new(
            "test-secret",
            Duration::from_secs(300),
            Duration::from_secs(86_400),
        ),
    }
}

fn create_test_app(db: DatabaseConnection) -> Router {
    app(create_test_state(db))
}

#[tokio::test]
async fn test_settings_endpoint_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_site_settings()]])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/meta")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // A fresh session cookie rides along on every cookieless request.
    assert!(response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn test_create_film_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/films")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/register")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","password":"short","password_confirm":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_rejects_unknown_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/token")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"ghost","password":"whatever1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moderation_requires_staff() {
    // The auth middleware resolves the token subject to a regular user.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", "alice")]])
        .into_connection();
    let state = create_test_state(db);
    let access = state.token_manager.issue_pair("u1").unwrap().access;
    let app = app(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/comments/c1/moderate")
                .method("POST")
                .header("Content-Type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {access}"))
                .body(Body::from(r#"{"status":"approved"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_vote_lands() {
    // Vote flow: load the comment, register the flag, bump the counter,
    // re-read the fresh counts.
    let mut voted = test_comment("c1", "f1", "u1");
    voted.like_count = 1;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_comment("c1", "f1", "u1")], vec![voted]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = create_test_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/comments/c1/like")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

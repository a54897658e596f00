//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cinema_common::{IdGenerator, TokenKind, TokenManager};
use cinema_core::{
    ActorService, CollectionService, CommentService, CountryService, DirectorService, FilmService,
    GenreService, LanguageService, LinkService, SiteSettingsService, UserService,
};

use crate::extractors::SessionId;

/// Name of the anonymous session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub film_service: FilmService,
    pub comment_service: CommentService,
    pub link_service: LinkService,
    pub genre_service: GenreService,
    pub collection_service: CollectionService,
    pub country_service: CountryService,
    pub language_service: LanguageService,
    pub actor_service: ActorService,
    pub director_service: DirectorService,
    pub site_settings_service: SiteSettingsService,
    pub token_manager: TokenManager,
}

/// Authentication middleware.
///
/// Verifies a `Bearer` access token and inserts the account into request
/// extensions. Invalid or missing tokens leave the request anonymous;
/// extractors decide whether that is an error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.token_manager.verify(token, TokenKind::Access)
        && let Ok(user) = state.user_service.get(&claims.sub).await
        && user.is_active
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Session middleware.
///
/// Every request carries a session ID: either the `sid` cookie sent by the
/// client, or a fresh one set on the response. The ID scopes vote flags and
/// anonymous visit deduplication.
pub async fn session_middleware(mut req: Request<Body>, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    let (session_id, fresh) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), false),
        None => (IdGenerator::new().generate_session_id(), true),
    };

    req.extensions_mut().insert(SessionId(session_id.clone()));

    let mut response = next.run(req).await;

    if fresh {
        let cookie = Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        if let Ok(value) = header::HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

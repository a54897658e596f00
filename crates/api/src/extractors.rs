//! Request extractors for authentication and sessions.

use axum::{extract::FromRequestParts, http::request::Parts};
use cinema_common::AppError;
use cinema_db::entities::user;

/// Extractor for the authenticated user.
///
/// The auth middleware inserts the user model into request extensions
/// after verifying the access token.
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Extractor for an optionally authenticated user.
pub struct MaybeAuthUser(pub Option<user::Model>);

impl MaybeAuthUser {
    /// Whether the viewer is a staff member.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.0.as_ref().is_some_and(|u| u.is_staff)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Extractor requiring a staff account.
///
/// Missing credentials reject with 401, a valid non-staff account with 403.
pub struct StaffUser(pub user::Model);

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        if !user.is_staff {
            return Err(AppError::Forbidden("staff access required".to_string()));
        }
        Ok(Self(user))
    }
}

/// Extractor requiring a superuser account.
pub struct SuperUser(pub user::Model);

impl<S> FromRequestParts<S> for SuperUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        if !user.is_superuser {
            return Err(AppError::Forbidden("superuser access required".to_string()));
        }
        Ok(Self(user))
    }
}

/// The anonymous session identifier assigned by the session middleware.
///
/// Present on every request; keys vote idempotency flags and visit
/// deduplication for anonymous visitors.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session middleware not installed".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use cinema_db::test_utils::{test_staff, test_user};

    fn parts_with(user: Option<user::Model>) -> Parts {
        let mut req = Request::builder().body(()).unwrap();
        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }
        req.into_parts().0
    }

    #[tokio::test]
    async fn test_auth_user_requires_extension() {
        let mut parts = parts_with(None);
        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_staff_user_rejects_regular_account() {
        let mut parts = parts_with(Some(test_user("u1", "alice")));
        let result = StaffUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_staff_user_accepts_staff() {
        let mut parts = parts_with(Some(test_staff("s1", "mod")));
        let result = StaffUser::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_maybe_auth_user_is_infallible() {
        let mut parts = parts_with(None);
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}

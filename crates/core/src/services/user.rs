//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use cinema_common::{AppError, AppResult, IdGenerator};
use cinema_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    pub password: String,

    /// Must match `password`.
    pub password_confirm: String,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

/// Input for username/password login.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Input for a user updating their own profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    pub password: Option<String>,
}

/// Input for staff updating any user account.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user account.
    pub async fn register(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;
        validate_password(&input.password)?;

        if input.password != input.password_confirm {
            return Err(AppError::invalid(
                "password_confirm",
                "passwords do not match",
            ));
        }

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("username already taken".to_string()));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            is_staff: Set(false),
            is_superuser: Set(false),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate by username and password, stamping the login time.
    ///
    /// Returns `Unauthorized` for unknown usernames, wrong passwords, and
    /// deactivated accounts alike.
    pub async fn authenticate(&self, input: &LoginInput) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let model = user::ActiveModel {
            id: Set(user.id.clone()),
            last_login: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        self.user_repo.update(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Update the caller's own profile.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let mut model = user::ActiveModel {
            id: Set(user.id.clone()),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        if let Some(email) = input.email {
            if email != user.email {
                if self.user_repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict("email already registered".to_string()));
                }
                model.email = Set(email);
            }
        }
        if let Some(first_name) = input.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(password) = input.password {
            validate_password(&password)?;
            model.password_hash = Set(hash_password(&password)?);
        }

        self.user_repo.update(model).await
    }

    /// Update any user account (staff operation).
    pub async fn update_user(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;

        let mut model = user::ActiveModel {
            id: Set(user.id.clone()),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(is_staff) = input.is_staff {
            model.is_staff = Set(is_staff);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }

        self.user_repo.update(model).await
    }

    /// Delete a user account (staff operation).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(id).await?;
        self.user_repo.delete(id).await
    }

    /// List users (staff operation).
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(limit, offset).await
    }
}

/// Check the password rules: at least six characters, containing both
/// letters and digits.
fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < 6 {
        return Err(AppError::invalid(
            "password",
            "password must be at least 6 characters",
        ));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(AppError::invalid(
            "password",
            "password must contain at least one letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::invalid(
            "password",
            "password must contain at least one digit",
        ));
    }
    Ok(())
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_db::test_utils::test_user;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> UserService {
        UserService::new(UserRepository::new(Arc::new(db)))
    }

    fn register_input(username: &str, password: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
            password_confirm: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(validate_password("a1b2").is_err());
    }

    #[test]
    fn test_validate_password_no_digit() {
        assert!(validate_password("abcdef").is_err());
    }

    #[test]
    fn test_validate_password_no_letter() {
        assert!(validate_password("123456").is_err());
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("abc123").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("wrong2x", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let mut input = register_input("alice", "abc123");
        input.password_confirm = "xyz789".to_string();

        let result = svc.register(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_username_taken() {
        let existing = test_user("u1", "alice");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let svc = service(db);

        let result = svc.register(register_input("alice", "abc123")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let svc = service(db);

        let input = LoginInput {
            username: "ghost".to_string(),
            password: "abc123".to_string(),
        };
        let result = svc.authenticate(&input).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_account() {
        let mut user = test_user("u1", "alice");
        user.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();
        let svc = service(db);

        let input = LoginInput {
            username: "alice".to_string(),
            password: "abc123".to_string(),
        };
        let result = svc.authenticate(&input).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut user = test_user("u1", "alice");
        user.password_hash = hash_password("abc123").unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();
        let svc = service(db);

        let input = LoginInput {
            username: "alice".to_string(),
            password: "wrong9x".to_string(),
        };
        let result = svc.authenticate(&input).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}

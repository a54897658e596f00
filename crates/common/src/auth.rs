//! JWT access/refresh token handling.

use std::time::Duration;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// The role a token plays in the access/refresh pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Whether this is an access or refresh token.
    pub kind: TokenKind,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// An access/refresh token pair with distinct lifetimes.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies the JWT pairs used for API authentication.
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    /// Create a token manager from a raw HMAC secret and lifetimes.
    #[must_use]
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Create a token manager from the application auth configuration.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.secret,
            Duration::from_secs(config.access_ttl_secs),
            Duration::from_secs(config.refresh_ttl_secs),
        )
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: &str) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access, self.access_ttl)?,
            refresh: self.issue(user_id, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    fn issue(&self, user_id: &str, kind: TokenKind, ttl: Duration) -> AppResult<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: now.timestamp() + ttl.as_secs() as i64,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a token's signature and expiry, and check it is of the
    /// expected kind. A refresh token is never accepted where an access
    /// token is required, and vice versa.
    pub fn verify(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized)?;

        if data.claims.kind != expected {
            return Err(AppError::Unauthorized);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new(
            "test-secret",
            Duration::from_secs(300),
            Duration::from_secs(86_400),
        )
    }

    #[test]
    fn test_issue_and_verify_access() {
        let tokens = manager();
        let pair = tokens.issue_pair("user1").unwrap();

        let claims = tokens.verify(&pair.access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let tokens = manager();
        let pair = tokens.issue_pair("user1").unwrap();

        let result = tokens.verify(&pair.refresh, TokenKind::Access);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = manager();
        let other = TokenManager::new(
            "other-secret",
            Duration::from_secs(300),
            Duration::from_secs(86_400),
        );
        let pair = other.issue_pair("user1").unwrap();

        let result = tokens.verify(&pair.access, TokenKind::Access);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = manager();

        // Back-date the claims well past the default validation leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user1".to_string(),
            kind: TokenKind::Access,
            iat: now - 7200,
            exp: now - 3600,
        };
        let stale = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let result = tokens.verify(&stale, TokenKind::Access);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}

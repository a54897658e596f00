//! Session-scoped vote idempotency flags.
//!
//! A vote flag is keyed by (session, comment, kind) and lives exactly as long
//! as the session does. There is no persisted vote record: rotating or
//! clearing the session resets voting eligibility. The Redis implementation
//! uses `SET NX` so that two concurrent identical votes from the same session
//! resolve to exactly one winner.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::{Expiration, SetOptions};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// The two independent vote counters a comment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    /// Stable string form, used in Redis keys and URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

/// Records which votes a session has already cast.
#[async_trait::async_trait]
pub trait VoteRegistry: Send + Sync {
    /// Atomically record a vote flag. Returns `true` if this is the first
    /// vote of this kind by this session on this comment, `false` if the
    /// flag was already set.
    async fn try_register(
        &self,
        session: &str,
        comment_id: &str,
        kind: VoteKind,
    ) -> AppResult<bool>;
}

/// Redis-backed vote registry. Flag TTL matches the session lifetime.
#[derive(Clone)]
pub struct RedisVoteRegistry {
    redis: Arc<RedisClient>,
    prefix: String,
    ttl_secs: i64,
}

impl RedisVoteRegistry {
    /// Create a registry whose flags expire with the session.
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>, session_ttl: Duration) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
            ttl_secs: session_ttl.as_secs() as i64,
        }
    }

    fn vote_key(&self, session: &str, comment_id: &str, kind: VoteKind) -> String {
        format!("{}:vote:{session}:{comment_id}:{}", self.prefix, kind.as_str())
    }
}

#[async_trait::async_trait]
impl VoteRegistry for RedisVoteRegistry {
    async fn try_register(
        &self,
        session: &str,
        comment_id: &str,
        kind: VoteKind,
    ) -> AppResult<bool> {
        let key = self.vote_key(session, comment_id, kind);

        let result: Option<String> = self
            .redis
            .set(
                key,
                "1",
                Some(Expiration::EX(self.ttl_secs)),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        Ok(result.is_some())
    }
}

/// In-memory vote registry for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryVoteRegistry {
    flags: std::sync::Mutex<HashSet<String>>,
}

impl MemoryVoteRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VoteRegistry for MemoryVoteRegistry {
    async fn try_register(
        &self,
        session: &str,
        comment_id: &str,
        kind: VoteKind,
    ) -> AppResult<bool> {
        let key = format!("{session}:{comment_id}:{}", kind.as_str());

        let mut flags = self
            .flags
            .lock()
            .map_err(|_| AppError::Internal("vote registry lock poisoned".to_string()))?;

        Ok(flags.insert(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_vote_registers() {
        let registry = MemoryVoteRegistry::new();
        assert!(
            registry
                .try_register("s1", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_repeat_vote_rejected() {
        let registry = MemoryVoteRegistry::new();
        assert!(
            registry
                .try_register("s1", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
        assert!(
            !registry
                .try_register("s1", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_like_and_dislike_are_independent() {
        let registry = MemoryVoteRegistry::new();
        assert!(
            registry
                .try_register("s1", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
        assert!(
            registry
                .try_register("s1", "c1", VoteKind::Dislike)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = MemoryVoteRegistry::new();
        assert!(
            registry
                .try_register("s1", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
        assert!(
            registry
                .try_register("s2", "c1", VoteKind::Like)
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_vote_key_layout() {
        let registry = RedisVoteRegistry {
            redis: Arc::new(RedisClient::default()),
            prefix: "cinema".to_string(),
            ttl_secs: 60,
        };
        assert_eq!(
            registry.vote_key("s1", "c1", VoteKind::Dislike),
            "cinema:vote:s1:c1:dislike"
        );
    }
}

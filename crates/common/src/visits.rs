//! Deduplicated visit tracking for film detail views.
//!
//! The tracker answers one question: has this visitor already viewed this
//! film within the dedup window? The Redis implementation uses `SET NX` with
//! a TTL, so the check and the marking happen in a single atomic command.
//! The tracker is advisory: callers treat a Redis failure as "already seen"
//! rather than failing the request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::{Expiration, SetOptions};

use crate::error::{AppError, AppResult};

/// Default dedup window: 24 hours.
const DEFAULT_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Decides whether a (visitor, film) view is a new visit.
#[async_trait::async_trait]
pub trait VisitTracker: Send + Sync {
    /// Returns `true` exactly once per (visitor, film) pair within the
    /// dedup window; `false` for every repeat inside the window.
    async fn is_new_visit(&self, visitor: &str, film_id: &str) -> AppResult<bool>;
}

/// Redis-backed visit tracker.
#[derive(Clone)]
pub struct RedisVisitTracker {
    redis: Arc<RedisClient>,
    prefix: String,
    window_secs: i64,
}

impl RedisVisitTracker {
    /// Create a tracker with the default 24h window.
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self::with_window(redis, prefix, Duration::from_secs(DEFAULT_WINDOW_SECS))
    }

    /// Create a tracker with a custom dedup window.
    #[must_use]
    pub fn with_window(
        redis: Arc<RedisClient>,
        prefix: impl Into<String>,
        window: Duration,
    ) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
            window_secs: window.as_secs() as i64,
        }
    }

    fn visit_key(&self, visitor: &str, film_id: &str) -> String {
        format!("{}:visit:{visitor}:{film_id}", self.prefix)
    }
}

#[async_trait::async_trait]
impl VisitTracker for RedisVisitTracker {
    async fn is_new_visit(&self, visitor: &str, film_id: &str) -> AppResult<bool> {
        let key = self.visit_key(visitor, film_id);

        // SET NX EX: returns OK only when the key did not exist yet.
        let result: Option<String> = self
            .redis
            .set(
                key,
                "1",
                Some(Expiration::EX(self.window_secs)),
                Some(SetOptions::NX),
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        Ok(result.is_some())
    }
}

/// In-memory visit tracker for tests and single-process deployments.
pub struct MemoryVisitTracker {
    seen: std::sync::Mutex<HashMap<String, Instant>>,
    window: Duration,
}

impl Default for MemoryVisitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVisitTracker {
    /// Create a tracker with the default 24h window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(DEFAULT_WINDOW_SECS))
    }

    /// Create a tracker with a custom dedup window.
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            seen: std::sync::Mutex::new(HashMap::new()),
            window,
        }
    }
}

#[async_trait::async_trait]
impl VisitTracker for MemoryVisitTracker {
    async fn is_new_visit(&self, visitor: &str, film_id: &str) -> AppResult<bool> {
        let key = format!("{visitor}:{film_id}");
        let now = Instant::now();

        let mut seen = self
            .seen
            .lock()
            .map_err(|_| AppError::Internal("visit tracker lock poisoned".to_string()))?;

        match seen.get(&key) {
            Some(at) if now.duration_since(*at) < self.window => Ok(false),
            _ => {
                seen.insert(key, now);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_visit_is_new() {
        let tracker = MemoryVisitTracker::new();
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
    }

    #[tokio::test]
    async fn test_repeat_visit_within_window_is_not_new() {
        let tracker = MemoryVisitTracker::new();
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
        assert!(!tracker.is_new_visit("s1", "film1").await.unwrap());
    }

    #[tokio::test]
    async fn test_distinct_visitors_each_count() {
        let tracker = MemoryVisitTracker::new();
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
        assert!(tracker.is_new_visit("s2", "film1").await.unwrap());
        assert!(tracker.is_new_visit("s3", "film1").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_visitor_different_films() {
        let tracker = MemoryVisitTracker::new();
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
        assert!(tracker.is_new_visit("s1", "film2").await.unwrap());
    }

    #[tokio::test]
    async fn test_default_dedups_repeats() {
        // Default must carry the 24h window, not a zero-length one.
        let tracker = MemoryVisitTracker::default();
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
        assert!(!tracker.is_new_visit("s1", "film1").await.unwrap());
    }

    #[tokio::test]
    async fn test_window_expiry_counts_again() {
        let tracker = MemoryVisitTracker::with_window(Duration::from_millis(0));
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
        assert!(tracker.is_new_visit("s1", "film1").await.unwrap());
    }

    #[test]
    fn test_redis_key_layout() {
        // Key layout is part of the deployed Redis footprint; keep it stable.
        let tracker = RedisVisitTracker {
            redis: Arc::new(RedisClient::default()),
            prefix: "cinema".to_string(),
            window_secs: 60,
        };
        assert_eq!(tracker.visit_key("s1", "f1"), "cinema:visit:s1:f1");
    }
}

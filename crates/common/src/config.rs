//! Application configuration.

use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Redis configuration.
    pub redis: RedisConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Visit tracking configuration.
    #[serde(default)]
    pub visits: VisitConfig,
    /// Background job configuration.
    #[serde(default)]
    pub jobs: JobConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

/// Authentication configuration.
///
/// The defaults match a development deployment (long-lived tokens). A
/// production config is expected to shrink these, e.g. 300 / 86400 seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign JWTs.
    pub secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,
    /// Anonymous session lifetime in seconds. Bounds vote idempotency flags.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

/// Visit tracking configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitConfig {
    /// Deduplication window for film detail views, in seconds.
    #[serde(default = "default_visit_window")]
    pub window_secs: u64,
}

impl Default for VisitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_visit_window(),
        }
    }
}

/// Background job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Interval between rejected-comment purge sweeps, in seconds.
    #[serde(default = "default_purge_interval")]
    pub comment_purge_interval_secs: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            comment_purge_interval_secs: default_purge_interval(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_redis_prefix() -> String {
    "cinema".to_string()
}

// 7 days
const fn default_access_ttl() -> u64 {
    7 * 24 * 3600
}

// 20 days
const fn default_refresh_ttl() -> u64 {
    20 * 24 * 3600
}

// 14 days, matching a typical browser session cookie
const fn default_session_ttl() -> u64 {
    14 * 24 * 3600
}

// 24 hours
const fn default_visit_window() -> u64 {
    24 * 3600
}

// 1 hour
const fn default_purge_interval() -> u64 {
    3600
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CINEMA_ENV`)
    /// 3. Environment variables with `CINEMA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CINEMA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CINEMA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Visit deduplication window as a [`Duration`].
    #[must_use]
    pub const fn visit_window(&self) -> Duration {
        Duration::from_secs(self.visits.window_secs)
    }

    /// Anonymous session lifetime as a [`Duration`].
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_secs)
    }

    /// Rejected-comment purge interval as a [`Duration`].
    #[must_use]
    pub const fn comment_purge_interval(&self) -> Duration {
        Duration::from_secs(self.jobs.comment_purge_interval_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_development_lifetimes() {
        assert_eq!(default_access_ttl(), 604_800);
        assert_eq!(default_refresh_ttl(), 1_728_000);
        assert_eq!(default_visit_window(), 86_400);
    }

    #[test]
    fn test_visit_config_default() {
        let visits = VisitConfig::default();
        assert_eq!(visits.window_secs, 86_400);
    }
}

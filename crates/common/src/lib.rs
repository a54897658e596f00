//! Common utilities and shared types for cinema-rs.
//!
//! This crate provides foundational components used across all cinema-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Auth tokens**: JWT access/refresh pairs via [`TokenManager`]
//! - **Visit tracking**: Deduplicated film-view counting via [`VisitTracker`]
//! - **Vote flags**: Session-scoped vote idempotency via [`VoteRegistry`]

pub mod auth;
pub mod config;
pub mod error;
pub mod id;
pub mod sessions;
pub mod visits;

pub use auth::{Claims, TokenKind, TokenManager, TokenPair};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use sessions::{MemoryVoteRegistry, RedisVoteRegistry, VoteKind, VoteRegistry};
pub use visits::{MemoryVisitTracker, RedisVisitTracker, VisitTracker};

//! Core business logic for cinema-rs.

pub mod services;

pub use services::*;

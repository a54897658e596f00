//! Background jobs for cinema-rs.

pub mod scheduler;

pub use scheduler::{JobExecutor, SchedulerConfig, run_scheduler};

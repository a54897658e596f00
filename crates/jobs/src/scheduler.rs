//! Scheduled jobs for periodic maintenance tasks.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between rejected-comment sweeps (default: 1 hour).
    pub comment_purge_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            comment_purge_interval: Duration::from_secs(3600),
        }
    }
}

/// Job executor trait for scheduled jobs.
#[async_trait::async_trait]
pub trait JobExecutor: Send + Sync {
    /// Delete rejected comments. Returns the number removed.
    async fn purge_rejected_comments(
        &self,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Run the scheduler with the given configuration and executor.
pub async fn run_scheduler<E: JobExecutor + 'static>(config: SchedulerConfig, executor: Arc<E>) {
    let purge_interval = config.comment_purge_interval;

    tokio::spawn(async move {
        let mut interval = interval(purge_interval);
        loop {
            interval.tick().await;
            match executor.purge_rejected_comments().await {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!(count, "Purged rejected comments");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to purge rejected comments");
                }
            }
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingExecutor {
        runs: AtomicU64,
    }

    #[async_trait::async_trait]
    impl JobExecutor for CountingExecutor {
        async fn purge_rejected_comments(
            &self,
        ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }
    }

    #[test]
    fn test_scheduler_config_default() {
        let config = SchedulerConfig::default();
        assert_eq!(config.comment_purge_interval, Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_runs_purge_on_interval() {
        let executor = Arc::new(CountingExecutor {
            runs: AtomicU64::new(0),
        });

        run_scheduler(
            SchedulerConfig {
                comment_purge_interval: Duration::from_secs(60),
            },
            executor.clone(),
        )
        .await;

        // First tick fires immediately, then once per interval.
        tokio::time::sleep(Duration::from_secs(130)).await;
        assert!(executor.runs.load(Ordering::SeqCst) >= 2);
    }
}

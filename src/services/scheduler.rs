use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::config::SchedulerConfig;
use crate::services::QuestionPipeline;

/// Runs the cache eviction sweep on a fixed interval or cron schedule.
pub struct EvictionScheduler {
    pipeline: Arc<QuestionPipeline>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl EvictionScheduler {
    #[must_use]
    pub fn new(pipeline: Arc<QuestionPipeline>, config: SchedulerConfig) -> Self {
        Self {
            pipeline,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Blocks until [`stop`](Self::stop) is called.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Eviction scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting cache eviction scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
        info!("Stopping cache eviction scheduler");
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let pipeline = Arc::clone(&self.pipeline);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let pipeline = Arc::clone(&pipeline);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let removed = pipeline.evict_expired().await;
                info!(
                    event = "job_finished",
                    job_name = "evict_expired",
                    removed,
                    "Scheduled cache eviction finished"
                );
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Eviction scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.eviction_interval_minutes.max(1);
        info!("Eviction scheduler running: sweep every {}m", interval_mins);

        self.run_every(Duration::from_secs(u64::from(interval_mins) * 60))
            .await;
        Ok(())
    }

    /// Sweeps every `period` until stopped. The first tick fires immediately.
    pub(crate) async fn run_every(&self, period: Duration) {
        let mut ticker = interval(period);
        let mut stop_check = interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !*self.running.read().await {
                        break;
                    }
                    let removed = self.pipeline.evict_expired().await;
                    info!(
                        event = "job_finished",
                        job_name = "evict_expired",
                        removed,
                        "Scheduled cache eviction finished"
                    );
                }
                _ = stop_check.tick() => {
                    if !*self.running.read().await {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuestionSource, TechnologyId};
    use crate::services::cache::{ManualClock, QuestionCache};

    #[tokio::test]
    async fn disabled_scheduler_returns_immediately() {
        let pipeline = Arc::new(QuestionPipeline::new(
            Arc::new(QuestionCache::new(Duration::from_secs(60))),
            None,
        ));
        let config = SchedulerConfig {
            enabled: false,
            ..SchedulerConfig::default()
        };

        let scheduler = EvictionScheduler::new(pipeline, config);
        scheduler.start().await.unwrap();
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn interval_sweep_evicts_and_stops() {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(QuestionCache::with_clock(Duration::from_secs(60), clock.clone()));
        let pipeline = Arc::new(QuestionPipeline::new(cache.clone(), None));

        pipeline.get_questions("react", 2, &[]).await;
        assert_eq!(
            cache.get_entry(&TechnologyId::new("react")).await.unwrap().source,
            QuestionSource::Synthetic
        );
        clock.advance(Duration::from_secs(61));

        let scheduler = Arc::new(EvictionScheduler::new(pipeline, SchedulerConfig::default()));
        *scheduler.running.write().await = true;

        let runner = Arc::clone(&scheduler);
        let handle = tokio::spawn(async move { runner.run_every(Duration::from_millis(10)).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.is_empty().await);

        scheduler.stop().await;
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}

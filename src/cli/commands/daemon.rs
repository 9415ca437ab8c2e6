use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use crate::config::Config;
use crate::services::{EvictionScheduler, QuestionPipeline};

pub async fn cmd_daemon(config: &Config, preload: &[String]) -> anyhow::Result<()> {
    let pipeline = Arc::new(QuestionPipeline::from_config(config)?);

    if !preload.is_empty() {
        pipeline.preload(preload).await;
    }

    let scheduler = Arc::new(EvictionScheduler::new(
        Arc::clone(&pipeline),
        config.scheduler.clone(),
    ));

    let runner = Arc::clone(&scheduler);
    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = runner.start().await {
            error!("Eviction scheduler error: {}", e);
        }
    });

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    scheduler.stop().await;
    if let Err(e) = scheduler_handle.await {
        error!("Eviction scheduler task failed: {}", e);
    }

    Ok(())
}

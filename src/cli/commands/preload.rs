use crate::config::Config;
use crate::services::QuestionPipeline;

pub async fn cmd_preload(config: &Config, technologies: &[String]) -> anyhow::Result<()> {
    let pipeline = QuestionPipeline::from_config(config)?;

    println!("Preloading {} technologies...", technologies.len());
    pipeline.preload(technologies).await;

    println!();
    println!("Cache:");
    println!("{:-<60}", "");
    for entry in pipeline.cache_snapshot().await {
        println!(
            "• {:<20} {:>3} questions  source: {:<9} fetched: {}",
            entry.technology,
            entry.question_count,
            entry.source,
            entry.fetched_at.format("%H:%M:%S")
        );
    }

    Ok(())
}

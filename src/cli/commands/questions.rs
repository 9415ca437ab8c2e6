use futures::future::join_all;

use crate::config::Config;
use crate::domain::TechnologyId;
use crate::services::{QuestionBank, QuestionPipeline};

use super::print_question;

pub async fn cmd_questions(
    config: &Config,
    technologies: &[String],
    count: usize,
    json: bool,
) -> anyhow::Result<()> {
    let pipeline = QuestionPipeline::from_config(config)?;
    let bank = QuestionBank::new();

    let batches = join_all(technologies.iter().map(|technology| {
        let fallback = bank.questions_for(&TechnologyId::new(technology), count);
        let pipeline = &pipeline;
        async move { pipeline.fetch(technology, count, &fallback).await }
    }))
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&batches)?);
        return Ok(());
    }

    for batch in &batches {
        println!();
        println!(
            "{} ({} questions, source: {})",
            batch.technology,
            batch.questions.len(),
            batch.source
        );
        println!("{:-<60}", "");

        for (i, question) in batch.questions.iter().enumerate() {
            print_question(i + 1, question);
        }
    }

    Ok(())
}

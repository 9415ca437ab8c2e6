//! Hybrid question sourcing: cache, remote provider, caller fallback, then
//! synthetic placeholders.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::constants;
use crate::domain::{QuestionSource, TechnologyId};
use crate::models::{Question, QuestionError};
use crate::services::cache::{CacheEntryInfo, Clock, QuestionCache, SystemClock};
use crate::services::source::RemoteQuestionSource;
use crate::services::synthetic::SyntheticGenerator;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("synthetic generator produced an invalid question: {0}")]
    Generator(#[from] QuestionError),
}

/// Questions together with the stage that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionBatch {
    pub technology: TechnologyId,
    pub source: QuestionSource,
    pub questions: Vec<Question>,
}

impl QuestionBatch {
    fn empty(technology: TechnologyId) -> Self {
        Self {
            technology,
            source: QuestionSource::Synthetic,
            questions: Vec::new(),
        }
    }
}

/// Resolution stages, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Cache,
    Remote,
    Local,
    Synthetic,
}

impl Stage {
    const ORDER: [Self; 4] = [Self::Cache, Self::Remote, Self::Local, Self::Synthetic];

    const fn source(self) -> QuestionSource {
        match self {
            Self::Cache => QuestionSource::Cache,
            Self::Remote => QuestionSource::Remote,
            Self::Local => QuestionSource::Local,
            Self::Synthetic => QuestionSource::Synthetic,
        }
    }
}

pub struct QuestionPipeline {
    cache: Arc<QuestionCache>,
    remote: Option<Arc<dyn RemoteQuestionSource>>,
    synthetic: SyntheticGenerator,
    prefetch_count: usize,
}

impl QuestionPipeline {
    #[must_use]
    pub fn new(cache: Arc<QuestionCache>, remote: Option<Arc<dyn RemoteQuestionSource>>) -> Self {
        Self {
            cache,
            remote,
            synthetic: SyntheticGenerator::new(),
            prefetch_count: constants::cache::PREFETCH_COUNT,
        }
    }

    /// Wires a pipeline from config: system clock, configured TTL and the
    /// QuizAPI client when a key is available.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let cache = Arc::new(QuestionCache::with_clock(config.cache.ttl(), clock));
        let remote = crate::clients::quizapi::QuizApiClient::from_config(&config.remote)?
            .map(|client| Arc::new(client) as Arc<dyn RemoteQuestionSource>);

        if remote.is_none() {
            info!("Remote quiz source not configured, using local and synthetic questions");
        }

        Ok(Self::new(cache, remote).with_prefetch_count(config.cache.prefetch_count))
    }

    #[must_use]
    pub fn with_prefetch_count(mut self, count: usize) -> Self {
        self.prefetch_count = count.max(1);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QuestionCache> {
        &self.cache
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Up to `count` questions for `technology`. Never fails; the worst case
    /// is synthetic placeholders.
    pub async fn get_questions(
        &self,
        technology: &str,
        count: usize,
        local_fallback: &[Question],
    ) -> Vec<Question> {
        self.fetch(technology, count, local_fallback).await.questions
    }

    /// Like [`get_questions`](Self::get_questions) but also reports which
    /// stage answered.
    pub async fn fetch(
        &self,
        technology: &str,
        count: usize,
        local_fallback: &[Question],
    ) -> QuestionBatch {
        let technology = TechnologyId::new(technology);

        match self.resolve(&technology, count, local_fallback).await {
            Ok(batch) => batch,
            Err(e) => {
                error!(technology = %technology, error = %e, "Question sourcing failed");
                QuestionBatch::empty(technology)
            }
        }
    }

    async fn resolve(
        &self,
        technology: &TechnologyId,
        count: usize,
        local_fallback: &[Question],
    ) -> Result<QuestionBatch, PipelineError> {
        if count == 0 {
            return Ok(QuestionBatch::empty(technology.clone()));
        }

        for stage in Stage::ORDER {
            if let Some(mut questions) = self
                .attempt(stage, technology, count, local_fallback)
                .await?
            {
                questions.truncate(count);
                metrics::counter!(
                    "quiz_questions_served_total",
                    "source" => stage.source().as_str()
                )
                .increment(questions.len() as u64);
                debug!(
                    technology = %technology,
                    source = %stage.source(),
                    count = questions.len(),
                    "Resolved quiz questions"
                );
                return Ok(QuestionBatch {
                    technology: technology.clone(),
                    source: stage.source(),
                    questions,
                });
            }
        }

        Ok(QuestionBatch::empty(technology.clone()))
    }

    /// One stage. `Ok(None)` means "nothing here, try the next stage";
    /// `Some` is always non-empty.
    async fn attempt(
        &self,
        stage: Stage,
        technology: &TechnologyId,
        count: usize,
        local_fallback: &[Question],
    ) -> Result<Option<Vec<Question>>, PipelineError> {
        let questions = match stage {
            Stage::Cache => self.cache.get_fresh(technology, count).await,
            Stage::Remote => self.attempt_remote(technology, count).await,
            Stage::Local => {
                if local_fallback.is_empty() {
                    None
                } else {
                    let questions = local_fallback.to_vec();
                    self.cache
                        .put(technology, questions.clone(), QuestionSource::Local)
                        .await;
                    Some(questions)
                }
            }
            Stage::Synthetic => {
                let questions = self.synthetic.generate(technology, count)?;
                self.cache
                    .put(technology, questions.clone(), QuestionSource::Synthetic)
                    .await;
                Some(questions)
            }
        };

        Ok(questions.filter(|q| !q.is_empty()))
    }

    async fn attempt_remote(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Option<Vec<Question>> {
        let remote = self.remote.as_ref()?;

        match remote.fetch_questions(technology, count).await {
            Ok(questions) if !questions.is_empty() => {
                self.cache
                    .put(technology, questions.clone(), QuestionSource::Remote)
                    .await;
                Some(questions)
            }
            Ok(_) => {
                metrics::counter!("quiz_remote_failures_total").increment(1);
                debug!(
                    technology = %technology,
                    source = remote.name(),
                    "Remote source returned nothing"
                );
                None
            }
            Err(e) => {
                metrics::counter!("quiz_remote_failures_total").increment(1);
                warn!(
                    technology = %technology,
                    source = remote.name(),
                    error = %e,
                    "Remote source unavailable, falling back"
                );
                None
            }
        }
    }

    /// Warms the cache for each technology concurrently with the prefetch
    /// count. Individual outcomes are not reported.
    pub async fn preload<S: AsRef<str>>(&self, technologies: &[S]) {
        let start = std::time::Instant::now();

        let results = join_all(technologies.iter().map(|technology| {
            let technology = TechnologyId::new(technology.as_ref());
            async move {
                self.resolve(&technology, self.prefetch_count, &[])
                    .await
                    .map(|batch| batch.source)
            }
        }))
        .await;

        let failed = results.iter().filter(|r| r.is_err()).count();

        info!(
            technologies = technologies.len(),
            failed,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Preloaded quiz questions"
        );
    }

    /// Removes stale cache entries. The count is for diagnostics only.
    pub async fn evict_expired(&self) -> usize {
        let removed = self.cache.evict_expired().await;
        if removed > 0 {
            metrics::counter!("quiz_cache_evictions_total").increment(removed as u64);
            info!(removed, "Evicted expired quiz cache entries");
        } else {
            debug!("No expired quiz cache entries");
        }
        removed
    }

    pub async fn cache_snapshot(&self) -> Vec<CacheEntryInfo> {
        self.cache.snapshot().await
    }
}

impl std::fmt::Debug for QuestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionPipeline")
            .field("remote", &self.remote.as_ref().map(|r| r.name().to_string()))
            .field("prefetch_count", &self.prefetch_count)
            .finish_non_exhaustive()
    }
}

/// Default TTL as a [`Duration`], for callers building a cache by hand.
#[must_use]
pub const fn default_ttl() -> Duration {
    Duration::from_secs(constants::cache::QUESTION_TTL_SECONDS)
}

//! Behavioural tests for the question sourcing pipeline.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use quizsource::constants::limits::MAX_SYNTHETIC_QUESTIONS;
use quizsource::domain::{QuestionSource, TechnologyId};
use quizsource::models::{Difficulty, Question};
use quizsource::services::{
    ManualClock, QuestionBank, QuestionCache, QuestionPipeline, RemoteQuestionSource, SourceError,
};

const TTL: Duration = Duration::from_secs(3600);

/// Remote double that answers with `count` questions until told to fail.
struct MockRemote {
    failing: AtomicBool,
    calls: AtomicUsize,
    latency: Duration,
}

impl MockRemote {
    fn healthy() -> Arc<Self> {
        Arc::new(Self {
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            latency: Duration::ZERO,
        })
    }

    fn failing() -> Arc<Self> {
        let remote = Self::healthy();
        remote.set_failing(true);
        remote
    }

    fn slow(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            latency,
        })
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteQuestionSource for MockRemote {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Result<Vec<Question>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Http {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        Ok((0..count)
            .map(|i| {
                Question::new(
                    format!("remote-{technology}-{i}"),
                    technology.clone(),
                    format!("Remote question {i} about {technology}"),
                    vec!["a".to_string(), "b".to_string(), "c".to_string()],
                    i % 3,
                    Difficulty::Intermediate,
                    "remote",
                )
                .unwrap()
            })
            .collect())
    }
}

fn pipeline_with(remote: Option<Arc<MockRemote>>) -> (QuestionPipeline, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let cache = Arc::new(QuestionCache::with_clock(TTL, clock.clone()));
    let remote = remote.map(|r| r as Arc<dyn RemoteQuestionSource>);
    (QuestionPipeline::new(cache, remote), clock)
}

fn local_question(n: usize) -> Question {
    Question::new(
        format!("Q{n}"),
        TechnologyId::new("python"),
        format!("Local question {n}"),
        vec!["yes".to_string(), "no".to_string()],
        n % 2,
        Difficulty::Beginner,
        "local",
    )
    .unwrap()
}

fn assert_valid(questions: &[Question]) {
    for q in questions {
        assert!(q.options().len() >= 2, "{} has too few options", q.id());
        assert!(
            q.correct_option_index() < q.options().len(),
            "{} has an out-of-range answer",
            q.id()
        );
    }
}

#[tokio::test]
async fn every_question_satisfies_invariant_and_cap() {
    let fallback: Vec<Question> = (1..=4).map(local_question).collect();

    for remote in [None, Some(MockRemote::healthy()), Some(MockRemote::failing())] {
        let (pipeline, _clock) = pipeline_with(remote);

        for technology in ["react", "python", "unknown-tech-xyz", "Java"] {
            for count in [1, 2, 3, 7] {
                for local in [&[][..], &fallback[..]] {
                    let questions = pipeline.get_questions(technology, count, local).await;
                    assert!(questions.len() <= count);
                    assert!(!questions.is_empty());
                    assert_valid(&questions);
                }
            }
        }
    }
}

#[tokio::test]
async fn cache_serves_second_call_when_remote_fails() {
    let remote = MockRemote::healthy();
    let (pipeline, _clock) = pipeline_with(Some(remote.clone()));

    let first = pipeline.fetch("react", 3, &[]).await;
    assert_eq!(first.source, QuestionSource::Remote);

    remote.set_failing(true);
    let second = pipeline.fetch("React", 3, &[]).await;

    assert_eq!(second.source, QuestionSource::Cache);
    assert_eq!(first.questions, second.questions);
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn local_fallback_beats_synthetic() {
    let remote = MockRemote::failing();
    let (pipeline, _clock) = pipeline_with(Some(remote.clone()));
    let fallback: Vec<Question> = (1..=3).map(local_question).collect();

    let batch = pipeline.fetch("python", 2, &fallback).await;

    assert_eq!(batch.source, QuestionSource::Local);
    assert_eq!(batch.questions.len(), 2);
    let allowed: HashSet<&str> = fallback.iter().map(Question::id).collect();
    assert!(batch.questions.iter().all(|q| allowed.contains(q.id())));
    assert_eq!(remote.calls(), 1);

    let entry = pipeline
        .cache()
        .get_entry(&TechnologyId::new("python"))
        .await
        .unwrap();
    assert_eq!(entry.source, QuestionSource::Local);
    assert_eq!(entry.questions.len(), 3);
}

#[tokio::test]
async fn remote_success_is_cached_with_remote_provenance() {
    let remote = MockRemote::healthy();
    let (pipeline, _clock) = pipeline_with(Some(remote));

    let fallback: Vec<Question> = (1..=3).map(local_question).collect();
    let batch = pipeline.fetch("python", 2, &fallback).await;

    assert_eq!(batch.source, QuestionSource::Remote);
    assert!(batch.questions.iter().all(|q| q.id().starts_with("remote-")));

    let entry = pipeline
        .cache()
        .get_entry(&TechnologyId::new("python"))
        .await
        .unwrap();
    assert_eq!(entry.source, QuestionSource::Remote);
}

#[tokio::test]
async fn eviction_forces_remote_refetch() {
    let remote = MockRemote::healthy();
    let (pipeline, clock) = pipeline_with(Some(remote.clone()));

    pipeline.get_questions("react", 3, &[]).await;
    assert_eq!(remote.calls(), 1);

    clock.advance(TTL + Duration::from_secs(1));
    assert_eq!(pipeline.evict_expired().await, 1);
    assert!(pipeline.cache().is_empty().await);

    let batch = pipeline.fetch("react", 3, &[]).await;
    assert_eq!(batch.source, QuestionSource::Remote);
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn stale_entry_is_refreshed_without_sweep() {
    let remote = MockRemote::healthy();
    let (pipeline, clock) = pipeline_with(Some(remote.clone()));

    pipeline.get_questions("rust", 2, &[]).await;
    clock.advance(TTL);

    let batch = pipeline.fetch("rust", 2, &[]).await;
    assert_eq!(batch.source, QuestionSource::Remote);
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn larger_request_than_cached_goes_back_to_remote() {
    let remote = MockRemote::healthy();
    let (pipeline, _clock) = pipeline_with(Some(remote.clone()));

    pipeline.get_questions("docker", 2, &[]).await;
    let batch = pipeline.fetch("docker", 4, &[]).await;

    assert_eq!(batch.source, QuestionSource::Remote);
    assert_eq!(batch.questions.len(), 4);
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn unknown_technology_without_remote_is_synthetic() {
    let (pipeline, _clock) = pipeline_with(None);

    let batch = pipeline.fetch("unknown-tech-xyz", 3, &[]).await;

    assert_eq!(batch.source, QuestionSource::Synthetic);
    assert_eq!(batch.questions.len(), 3);
    for q in &batch.questions {
        assert!(q.prompt().contains("unknown-tech-xyz"));
    }
    assert_valid(&batch.questions);
}

#[tokio::test]
async fn oversized_synthetic_request_is_capped() {
    let (pipeline, _clock) = pipeline_with(None);

    let batch = pipeline.fetch("unknown-tech-xyz", usize::MAX, &[]).await;

    assert_eq!(batch.source, QuestionSource::Synthetic);
    assert!(!batch.questions.is_empty());
    assert!(batch.questions.len() <= MAX_SYNTHETIC_QUESTIONS);
    assert_valid(&batch.questions);
}

#[tokio::test]
async fn concurrent_misses_leave_a_valid_cache() {
    let remote = MockRemote::slow(Duration::from_millis(20));
    let (pipeline, _clock) = pipeline_with(Some(remote.clone()));

    let (a, b) = tokio::join!(
        pipeline.get_questions("java", 3, &[]),
        pipeline.get_questions("java", 3, &[])
    );
    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 3);
    assert!(remote.calls() >= 1);

    let cached = pipeline.fetch("java", 3, &[]).await;
    assert_eq!(cached.source, QuestionSource::Cache);
    assert_eq!(cached.questions.len(), 3);
    assert_valid(&cached.questions);
}

#[tokio::test]
async fn preload_warms_cache_and_ignores_failures() {
    let remote = MockRemote::failing();
    let (pipeline, _clock) = pipeline_with(Some(remote.clone()));

    pipeline.preload(&["react", "python", "unknown-tech-xyz"]).await;

    assert_eq!(remote.calls(), 3);
    let snapshot = pipeline.cache_snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.iter().all(|e| e.question_count == 5));

    let batch = pipeline.fetch("python", 5, &[]).await;
    assert_eq!(batch.source, QuestionSource::Cache);
    assert_eq!(remote.calls(), 3);
}

#[tokio::test]
async fn bank_feeds_local_fallback() {
    let (pipeline, _clock) = pipeline_with(Some(MockRemote::failing()));
    let bank = QuestionBank::new();
    let tech = TechnologyId::new("java");
    let fallback = bank.questions_for(&tech, 2);

    let batch = pipeline.fetch("java", 2, &fallback).await;

    assert_eq!(batch.source, QuestionSource::Local);
    assert!(batch.questions.iter().all(|q| q.id().starts_with("bank-java-")));
}

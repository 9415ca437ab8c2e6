//! In-memory question cache with TTL metadata.
//!
//! Owned by a [`QuestionPipeline`](crate::services::QuestionPipeline) and
//! injected into it, so tests can build as many independent caches as they
//! like and drive time through a [`Clock`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::domain::{QuestionSource, TechnologyId};
use crate::models::Question;

/// Source of "now" for staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub questions: Vec<Question>,
    pub fetched_at: DateTime<Utc>,
    pub source: QuestionSource,
}

impl CacheEntry {
    fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.fetched_at) >= ttl
    }
}

/// Per-technology summary for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryInfo {
    pub technology: TechnologyId,
    pub source: QuestionSource,
    pub question_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
}

pub struct QuestionCache {
    entries: RwLock<HashMap<TechnologyId, CacheEntry>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl QuestionCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    /// First `count` questions of a fresh entry holding at least `count`.
    pub async fn get_fresh(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Option<Vec<Question>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        let entry = entries.get(technology)?;

        if entry.is_stale(now, self.ttl) || entry.questions.len() < count {
            return None;
        }

        Some(entry.questions.iter().take(count).cloned().collect())
    }

    /// Replaces whatever was cached for `technology`.
    pub async fn put(
        &self,
        technology: &TechnologyId,
        questions: Vec<Question>,
        source: QuestionSource,
    ) {
        let entry = CacheEntry {
            questions,
            fetched_at: self.clock.now(),
            source,
        };
        self.entries.write().await.insert(technology.clone(), entry);
    }

    pub async fn get_entry(&self, technology: &TechnologyId) -> Option<CacheEntry> {
        self.entries.read().await.get(technology).cloned()
    }

    /// Drops every stale entry and returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(now, self.ttl));
        before - entries.len()
    }

    pub async fn snapshot(&self) -> Vec<CacheEntryInfo> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        let mut infos: Vec<CacheEntryInfo> = entries
            .iter()
            .map(|(technology, entry)| CacheEntryInfo {
                technology: technology.clone(),
                source: entry.source,
                question_count: entry.questions.len(),
                fetched_at: entry.fetched_at,
                stale: entry.is_stale(now, self.ttl),
            })
            .collect();
        infos.sort_by(|a, b| a.technology.cmp(&b.technology));
        infos
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

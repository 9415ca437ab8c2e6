use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::domain::TechnologyId;
use crate::models::{Difficulty, Question};
use crate::services::source::{RemoteQuestionSource, SourceError};

/// Built-in technology → provider tag vocabulary.
const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("nodejs", "Node.js"),
    ("node", "Node.js"),
    ("expressjs", "Node.js"),
    ("express", "Node.js"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("react", "React"),
    ("reactjs", "React"),
    ("nextjs", "Next.js"),
    ("vue", "VueJS"),
    ("vuejs", "VueJS"),
    ("angular", "Angular"),
    ("python", "Python"),
    ("django", "Django"),
    ("php", "PHP"),
    ("laravel", "Laravel"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("linux", "Linux"),
    ("bash", "BASH"),
    ("mysql", "MySQL"),
    ("postgresql", "Postgres"),
    ("postgres", "Postgres"),
    ("sql", "SQL"),
    ("devops", "DevOps"),
    ("wordpress", "WordPress"),
];

/// Maps technology identifiers to the provider's tag names.
///
/// Identifiers missing from the table are sent as their lowercased key.
#[derive(Debug, Clone)]
pub struct TagMap {
    tags: HashMap<String, String>,
}

impl Default for TagMap {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl TagMap {
    /// Built-in table with `overrides` layered on top. Override keys are
    /// normalized like [`TechnologyId`].
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::default();
        for (technology, tag) in overrides {
            map.tags
                .insert(TechnologyId::new(technology).to_string(), tag.clone());
        }
        map
    }

    /// Unmapped technologies come back as their normalized (lowercased) key.
    #[must_use]
    pub fn resolve(&self, technology: &TechnologyId) -> String {
        self.tags
            .get(technology.as_str())
            .cloned()
            .unwrap_or_else(|| technology.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct RawQuizRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub correct_answers: BTreeMap<String, Value>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
pub struct RawTag {
    pub name: String,
}

impl RawQuizRecord {
    fn record_id(&self, position: usize) -> String {
        match &self.id {
            Some(Value::Number(n)) => format!("quizapi-{n}"),
            Some(Value::String(s)) if !s.is_empty() => format!("quizapi-{s}"),
            _ => format!("quizapi-idx-{position}"),
        }
    }

    /// Keys (`answer_a`, ...) the provider marked as correct.
    fn correct_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self
            .correct_answers
            .iter()
            .filter(|(_, flag)| is_truthy(flag))
            .map(|(key, _)| key.trim_end_matches("_correct").to_string())
            .collect();

        if keys.is_empty()
            && let Some(key) = self.correct_answer.as_deref().map(str::trim)
            && !key.is_empty()
        {
            keys.insert(key.to_string());
        }

        keys
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).trim().to_string()
}

/// Turns one provider record into a validated [`Question`].
///
/// Options keep the provider's `answer_a..answer_f` order with null and blank
/// answers skipped. Exactly one option must be marked correct.
pub fn normalize_record(
    record: &RawQuizRecord,
    technology: &TechnologyId,
    fallback_category: &str,
    position: usize,
) -> Result<Question, SourceError> {
    let id = record.record_id(position);

    let prompt = record.question.as_deref().map(decode).unwrap_or_default();
    if prompt.is_empty() {
        return Err(SourceError::malformed(id, "missing question text"));
    }

    let answers: Vec<(&str, String)> = record
        .answers
        .iter()
        .filter_map(|(key, text)| {
            let text = decode(text.as_deref()?);
            (!text.is_empty()).then_some((key.as_str(), text))
        })
        .collect();

    let correct = record.correct_keys();
    if correct.len() != 1 {
        return Err(SourceError::malformed(
            id,
            format!("expected one correct answer, found {}", correct.len()),
        ));
    }

    let correct_key = correct.iter().next().map(String::as_str).unwrap_or_default();
    let Some(correct_index) = answers.iter().position(|(key, _)| *key == correct_key) else {
        return Err(SourceError::malformed(
            id,
            format!("correct answer {correct_key} has no option text"),
        ));
    };

    let category = record
        .tags
        .first()
        .map(|t| t.name.clone())
        .or_else(|| record.category.clone())
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| fallback_category.to_string());

    let difficulty = record
        .difficulty
        .as_deref()
        .map_or(Difficulty::Intermediate, Difficulty::from_label);

    let options = answers.into_iter().map(|(_, text)| text).collect();

    Question::new(
        id.clone(),
        technology.clone(),
        prompt,
        options,
        correct_index,
        difficulty,
        category,
    )
    .map_err(|e| SourceError::malformed(id, e.to_string()))
}

/// Normalizes a whole response. Bad records are dropped; the batch only
/// fails when nothing survives.
pub fn normalize_batch(
    records: &[RawQuizRecord],
    technology: &TechnologyId,
    fallback_category: &str,
) -> Result<Vec<Question>, SourceError> {
    if records.is_empty() {
        return Err(SourceError::EmptyResponse);
    }

    let mut questions = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for (position, record) in records.iter().enumerate() {
        match normalize_record(record, technology, fallback_category, position) {
            Ok(question) => questions.push(question),
            Err(e) => {
                dropped += 1;
                debug!(technology = %technology, error = %e, "Dropping quiz record");
            }
        }
    }

    if questions.is_empty() {
        return Err(SourceError::NoValidRecords { dropped });
    }

    Ok(questions)
}

#[derive(Clone)]
pub struct QuizApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    category: String,
    max_limit: usize,
    request_delay: Duration,
    tags: TagMap,
}

impl QuizApiClient {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            category: crate::constants::remote::DEFAULT_CATEGORY.to_string(),
            max_limit: crate::constants::remote::MAX_LIMIT,
            request_delay: Duration::from_millis(crate::constants::remote::REQUEST_DELAY_MS),
            tags: TagMap::default(),
        }
    }

    /// Builds a client from config, or `None` when the remote stage is
    /// disabled or no API key is available.
    pub fn from_config(config: &RemoteConfig) -> anyhow::Result<Option<Self>> {
        if !config.enabled {
            debug!("Remote quiz source disabled in config");
            return Ok(None);
        }

        let Some(api_key) = config.resolve_api_key() else {
            debug!("No quiz API key configured, remote source disabled");
            return Ok(None);
        };

        let client = crate::build_http_client(config.request_timeout_seconds)?;

        Ok(Some(
            Self::new(client, config.base_url.clone(), api_key)
                .with_category(config.category.clone())
                .with_max_limit(config.max_limit)
                .with_request_delay(config.request_delay())
                .with_tags(TagMap::with_overrides(&config.tag_overrides)),
        ))
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    #[must_use]
    pub const fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: TagMap) -> Self {
        self.tags = tags;
        self
    }

    fn questions_url(&self, tag: &str, limit: usize) -> Result<Url, SourceError> {
        let base_url = format!("{}/questions", self.base_url.trim_end_matches('/'));
        let mut url =
            Url::parse(&base_url).map_err(|e| SourceError::Unavailable(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("apiKey", &self.api_key)
            .append_pair("category", &self.category)
            .append_pair("tags", tag)
            .append_pair("limit", &limit.to_string());

        Ok(url)
    }
}

#[async_trait::async_trait]
impl RemoteQuestionSource for QuizApiClient {
    fn name(&self) -> &str {
        "quizapi"
    }

    async fn fetch_questions(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Result<Vec<Question>, SourceError> {
        let tag = self.tags.resolve(technology);
        let limit = count.clamp(1, self.max_limit);
        let url = self.questions_url(&tag, limit)?;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        debug!(technology = %technology, tag = %tag, limit, "Fetching quiz questions");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<RawQuizRecord> = response.json().await?;

        normalize_batch(&records, technology, &tag)
    }
}

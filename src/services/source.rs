//! Seam between the pipeline and remote question providers.

use crate::domain::TechnologyId;
use crate::models::Question;
use thiserror::Error;

/// Why a source produced nothing.
///
/// Every variant is recoverable: the pipeline logs it and moves on to the
/// next stage. Callers of the pipeline never see these.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("provider returned no questions")]
    EmptyResponse,

    #[error("malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("all {dropped} records were malformed")]
    NoValidRecords { dropped: usize },
}

impl SourceError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A remote provider of quiz questions.
///
/// Implementations issue at most one upstream request per call and report
/// failure through `Err`. They never return `Ok(vec![])`: an empty upstream
/// answer is [`SourceError::EmptyResponse`].
#[async_trait::async_trait]
pub trait RemoteQuestionSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn fetch_questions(
        &self,
        technology: &TechnologyId,
        count: usize,
    ) -> Result<Vec<Question>, SourceError>;
}

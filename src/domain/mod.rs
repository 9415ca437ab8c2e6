//! Domain types for question sourcing with strong typing.
//!
//! Technology identifiers arrive from UI selections in whatever casing the
//! caller used. They are normalized once here so every lookup (cache, tag
//! table, catalogs) is case-insensitive without repeating the lowering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a technology a quiz is about (e.g. `react`, `python`).
///
/// The wrapped key is trimmed and lowercased on construction, so
/// `TechnologyId::new("React")` and `TechnologyId::new(" react ")` are equal
/// and hash identically.
///
/// # Examples
///
/// ```rust
/// use quizsource::domain::TechnologyId;
///
/// let id = TechnologyId::new("React");
/// assert_eq!(id.as_str(), "react");
/// assert_eq!(id, TechnologyId::from("REACT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TechnologyId(String);

impl TechnologyId {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns the normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TechnologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TechnologyId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TechnologyId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<TechnologyId> for String {
    fn from(id: TechnologyId) -> Self {
        id.0
    }
}

impl AsRef<str> for TechnologyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a batch of questions came from.
///
/// Stored on every cache entry and reported alongside fetched batches. Only
/// used for diagnostics; it never changes what a caller receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    Cache,
    Remote,
    Local,
    Synthetic,
}

impl QuestionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

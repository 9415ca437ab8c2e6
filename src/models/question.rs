use crate::domain::TechnologyId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Maps provider difficulty labels (`Easy`, `Medium`, `Hard`) and our own
    /// names. Anything unrecognised lands in the middle.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" | "beginner" => Self::Beginner,
            "hard" | "advanced" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        f.pad(label)
    }
}

/// Reasons a question cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("correct option index {index} out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("question prompt is empty")]
    EmptyPrompt,
}

/// A single multiple-choice quiz question.
///
/// Fields are private and [`Question::new`] is the only constructor, so every
/// value in circulation satisfies `correct_option_index < options.len()` and
/// `options.len() >= 2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: String,
    technology: TechnologyId,
    prompt: String,
    options: Vec<String>,
    correct_option_index: usize,
    difficulty: Difficulty,
    category: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        technology: TechnologyId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        difficulty: Difficulty,
        category: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        if correct_option_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_option_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id: id.into(),
            technology,
            prompt,
            options,
            correct_option_index,
            difficulty,
            category: category.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn technology(&self) -> &TechnologyId {
        &self.technology
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub const fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_option_index
    }
}

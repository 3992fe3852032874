use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz question cannot be empty")]
    EmptyQuestion,

    #[error("quiz must offer at least one option")]
    NoOptions,

    #[error("duplicate quiz option id: {0}")]
    DuplicateOptionId(String),

    #[error("quiz must mark exactly one option correct")]
    NoCorrectOption,

    #[error("quiz marks more than one option correct")]
    MultipleCorrectOptions,

    #[error("selected option is not part of this quiz: {0}")]
    InvalidSelection(String),
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// A single answer choice within a quick check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

impl QuizOption {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            correct,
        }
    }
}

//
// ─── QUICK CHECK ───────────────────────────────────────────────────────────────
//

/// Result of evaluating a quick-check selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub is_correct: bool,
}

/// A single-question quiz attached to a lesson.
///
/// Well-formedness is enforced at construction: a non-empty question, at
/// least one option, unique option ids, and exactly one option marked
/// correct. A quiz with zero correct options is a content-authoring defect,
/// not a runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCheck {
    question: String,
    options: Vec<QuizOption>,
}

impl QuickCheck {
    /// Creates a new quick check.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the question is empty, no options are given,
    /// option ids collide, or the number of correct options is not exactly one.
    pub fn new(
        question: impl Into<String>,
        options: Vec<QuizOption>,
    ) -> Result<Self, QuizError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }

        let mut seen = std::collections::HashSet::new();
        for option in &options {
            if !seen.insert(option.id.as_str()) {
                return Err(QuizError::DuplicateOptionId(option.id.clone()));
            }
        }

        match options.iter().filter(|o| o.correct).count() {
            0 => return Err(QuizError::NoCorrectOption),
            1 => {}
            _ => return Err(QuizError::MultipleCorrectOptions),
        }

        Ok(Self {
            question: question.trim().to_owned(),
            options,
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    /// Scores a selected option.
    ///
    /// The outcome trusts the selected option's own `correct` flag rather
    /// than searching for a global "one true answer", so evaluation stays
    /// O(1) beyond the lookup and needs no second source of truth.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidSelection` if `selected_option_id` does
    /// not match any option.
    pub fn evaluate(&self, selected_option_id: &str) -> Result<QuizOutcome, QuizError> {
        let option = self
            .options
            .iter()
            .find(|o| o.id == selected_option_id)
            .ok_or_else(|| QuizError::InvalidSelection(selected_option_id.to_owned()))?;

        Ok(QuizOutcome {
            is_correct: option.correct,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use thiserror::Error;

use crate::model::ids::LessonId;
use crate::model::quiz::QuickCheck;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson body cannot be empty")]
    EmptyBody,
}

//
// ─── SECTIONS ──────────────────────────────────────────────────────────────────
//

/// An ordered subsection of a lesson body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single content unit: display text, optional sections and tip, an XP
/// reward granted on first completion, and an optional quick check.
///
/// Content is immutable at runtime; there is no mutation API past the
/// builder-style constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonContent {
    id: LessonId,
    title: String,
    body: String,
    xp_reward: u32,
    sections: Vec<Section>,
    tip: Option<String>,
    quiz: Option<QuickCheck>,
}

impl LessonContent {
    /// Creates a new lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if title or body is empty or whitespace-only.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        body: impl Into<String>,
        xp_reward: u32,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        let body = body.into();
        if body.trim().is_empty() {
            return Err(LessonError::EmptyBody);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            body: body.trim().to_owned(),
            xp_reward,
            sections: Vec::new(),
            tip: None,
            quiz: None,
        })
    }

    /// Appends a subsection, preserving insertion order.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    #[must_use]
    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    #[must_use]
    pub fn with_quiz(mut self, quiz: QuickCheck) -> Self {
        self.quiz = Some(quiz);
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// XP awarded on first successful completion.
    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn tip(&self) -> Option<&str> {
        self.tip.as_deref()
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuickCheck> {
        self.quiz.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

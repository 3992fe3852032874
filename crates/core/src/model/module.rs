use thiserror::Error;

use crate::model::ids::{LessonId, ModuleId};
use crate::model::lesson::LessonContent;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module title cannot be empty")]
    EmptyTitle,

    #[error("module must contain at least one lesson")]
    NoLessons,

    #[error("duplicate lesson id within module: {0}")]
    DuplicateLesson(LessonId),
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// A named, ordered course grouping of lessons.
///
/// Lesson order defines the unlock sequence: lesson `n + 1` stays locked
/// until lesson `n` is completed, and lesson 0 is always unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    description: Option<String>,
    lessons: Vec<LessonContent>,
}

impl Module {
    /// Creates a new module from an ordered lesson list.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError` if the title is empty, the lesson list is
    /// empty, or two lessons share an id.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        description: Option<String>,
        lessons: Vec<LessonContent>,
    ) -> Result<Self, ModuleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModuleError::EmptyTitle);
        }
        if lessons.is_empty() {
            return Err(ModuleError::NoLessons);
        }

        let mut seen = std::collections::HashSet::new();
        for lesson in &lessons {
            if !seen.insert(lesson.id().clone()) {
                return Err(ModuleError::DuplicateLesson(lesson.id().clone()));
            }
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description,
            lessons,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Lessons in unlock order.
    #[must_use]
    pub fn lessons(&self) -> &[LessonContent] {
        &self.lessons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&LessonContent> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    /// Position of a lesson within the unlock sequence.
    #[must_use]
    pub fn index_of(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| lesson.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

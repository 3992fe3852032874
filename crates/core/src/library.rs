use thiserror::Error;

use crate::model::{LessonContent, LessonId, Module, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("unknown module: {0}")]
    ModuleNotFound(ModuleId),

    #[error("unknown lesson: {0}")]
    LessonNotFound(LessonId),

    #[error("duplicate module id in library: {0}")]
    DuplicateModule(ModuleId),

    #[error("lesson id appears in more than one module: {0}")]
    DuplicateLesson(LessonId),
}

//
// ─── LIBRARY ───────────────────────────────────────────────────────────────────
//

/// The lesson content store: an immutable, ordered set of modules.
///
/// Lesson ids are unique across the whole library because they join against
/// externally persisted completion records. There is no mutation API; the
/// library is fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLibrary {
    modules: Vec<Module>,
}

impl ContentLibrary {
    /// Creates a library from an ordered module list.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if two modules share an id or a lesson id
    /// appears in more than one module.
    pub fn new(modules: Vec<Module>) -> Result<Self, ContentError> {
        let mut module_ids = std::collections::HashSet::new();
        let mut lesson_ids = std::collections::HashSet::new();
        for module in &modules {
            if !module_ids.insert(module.id().clone()) {
                return Err(ContentError::DuplicateModule(module.id().clone()));
            }
            for lesson in module.lessons() {
                if !lesson_ids.insert(lesson.id().clone()) {
                    return Err(ContentError::DuplicateLesson(lesson.id().clone()));
                }
            }
        }

        Ok(Self { modules })
    }

    /// Modules in display order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Fetches a module by id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::ModuleNotFound` if the id is unrecognized.
    pub fn module(&self, id: &ModuleId) -> Result<&Module, ContentError> {
        self.modules
            .iter()
            .find(|module| module.id() == id)
            .ok_or_else(|| ContentError::ModuleNotFound(id.clone()))
    }

    /// Fetches a lesson within a module.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::ModuleNotFound` for an unknown module id and
    /// `ContentError::LessonNotFound` if the lesson is absent from it.
    pub fn lesson(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
    ) -> Result<&LessonContent, ContentError> {
        self.module(module_id)?
            .lesson(lesson_id)
            .ok_or_else(|| ContentError::LessonNotFound(lesson_id.clone()))
    }

    /// Resolves a lesson id across all modules.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::LessonNotFound` if no module contains it.
    pub fn find_lesson(
        &self,
        lesson_id: &LessonId,
    ) -> Result<(&Module, &LessonContent), ContentError> {
        self.modules
            .iter()
            .find_map(|module| module.lesson(lesson_id).map(|lesson| (module, lesson)))
            .ok_or_else(|| ContentError::LessonNotFound(lesson_id.clone()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_module(module_id: &str, lesson_ids: &[&str]) -> Module {
        let lessons = lesson_ids
            .iter()
            .map(|id| {
                LessonContent::new(LessonId::new(*id), format!("Lesson {id}"), "Body", 50)
                    .unwrap()
            })
            .collect();
        Module::new(
            ModuleId::new(module_id),
            format!("Module {module_id}"),
            None,
            lessons,
        )
        .unwrap()
    }

    #[test]
    fn module_lookup_by_id() {
        let library = ContentLibrary::new(vec![
            build_module("m1", &["a", "b"]),
            build_module("m2", &["c"]),
        ])
        .unwrap();

        assert_eq!(library.len(), 2);
        assert_eq!(library.module(&ModuleId::new("m2")).unwrap().len(), 1);
    }

    #[test]
    fn unknown_module_fails() {
        let library = ContentLibrary::new(vec![build_module("m1", &["a"])]).unwrap();
        let err = library.module(&ModuleId::new("nope")).unwrap_err();
        assert_eq!(err, ContentError::ModuleNotFound(ModuleId::new("nope")));
    }

    #[test]
    fn lesson_lookup_within_module() {
        let library = ContentLibrary::new(vec![build_module("m1", &["a", "b"])]).unwrap();

        let lesson = library
            .lesson(&ModuleId::new("m1"), &LessonId::new("b"))
            .unwrap();
        assert_eq!(lesson.id(), &LessonId::new("b"));

        let err = library
            .lesson(&ModuleId::new("m1"), &LessonId::new("z"))
            .unwrap_err();
        assert_eq!(err, ContentError::LessonNotFound(LessonId::new("z")));
    }

    #[test]
    fn find_lesson_searches_all_modules() {
        let library = ContentLibrary::new(vec![
            build_module("m1", &["a"]),
            build_module("m2", &["b", "c"]),
        ])
        .unwrap();

        let (module, lesson) = library.find_lesson(&LessonId::new("c")).unwrap();
        assert_eq!(module.id(), &ModuleId::new("m2"));
        assert_eq!(lesson.id(), &LessonId::new("c"));

        let err = library.find_lesson(&LessonId::new("zz")).unwrap_err();
        assert_eq!(err, ContentError::LessonNotFound(LessonId::new("zz")));
    }

    #[test]
    fn new_rejects_duplicate_module_ids() {
        let err = ContentLibrary::new(vec![
            build_module("m1", &["a"]),
            build_module("m1", &["b"]),
        ])
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateModule(ModuleId::new("m1")));
    }

    #[test]
    fn new_rejects_lesson_id_shared_across_modules() {
        let err = ContentLibrary::new(vec![
            build_module("m1", &["a"]),
            build_module("m2", &["a"]),
        ])
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateLesson(LessonId::new("a")));
    }
}

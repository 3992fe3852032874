use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::LessonId;
use crate::model::module::Module;

//
// ─── LESSON STATE ──────────────────────────────────────────────────────────────
//

/// Per-user lifecycle of a single lesson.
///
/// `Locked → Unlocked` when the preceding lesson completes; lesson 0 starts
/// unlocked. `Unlocked → Completed` on the first recorded completion.
/// `Completed` is terminal; no un-completion operation exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonState {
    Locked,
    Unlocked,
    Completed,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Completion state for one lesson, owned by one user.
///
/// Created on first completion and never duplicated; the persistence
/// collaborator upserts keyed by `(user_id, lesson_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub lesson_id: LessonId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// A record for a lesson completed at the given time.
    #[must_use]
    pub fn completed(lesson_id: LessonId, completed_at: DateTime<Utc>) -> Self {
        Self {
            lesson_id,
            completed: true,
            completed_at: Some(completed_at),
        }
    }
}

//
// ─── MODULE PROGRESS ───────────────────────────────────────────────────────────
//

/// A user's completion map for one module, assembled from persisted records.
///
/// Unlock decisions are pure functions of this map plus the module's lesson
/// order; nothing here talks to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleProgress {
    records: HashMap<LessonId, ProgressRecord>,
}

impl ModuleProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ProgressRecord>) -> Self {
        let mut progress = Self::new();
        for record in records {
            progress.insert(record);
        }
        progress
    }

    /// Inserts or replaces the record for its lesson.
    pub fn insert(&mut self, record: ProgressRecord) {
        self.records.insert(record.lesson_id.clone(), record);
    }

    #[must_use]
    pub fn record(&self, lesson_id: &LessonId) -> Option<&ProgressRecord> {
        self.records.get(lesson_id)
    }

    #[must_use]
    pub fn is_completed(&self, lesson_id: &LessonId) -> bool {
        self.records
            .get(lesson_id)
            .is_some_and(|record| record.completed)
    }

    /// True iff the lesson at `lesson_index` may be opened.
    ///
    /// Lesson 0 is always unlocked; every later lesson unlocks only once its
    /// immediate predecessor is completed. There is no skip-ahead. Indices
    /// past the end of the module are locked.
    #[must_use]
    pub fn is_unlocked(&self, module: &Module, lesson_index: usize) -> bool {
        if lesson_index >= module.len() {
            return false;
        }
        if lesson_index == 0 {
            return true;
        }
        module
            .lessons()
            .get(lesson_index - 1)
            .is_some_and(|previous| self.is_completed(previous.id()))
    }

    /// Resolves the state of the lesson at `lesson_index`.
    #[must_use]
    pub fn state_of(&self, module: &Module, lesson_index: usize) -> LessonState {
        let Some(lesson) = module.lessons().get(lesson_index) else {
            return LessonState::Locked;
        };
        if self.is_completed(lesson.id()) {
            LessonState::Completed
        } else if self.is_unlocked(module, lesson_index) {
            LessonState::Unlocked
        } else {
            LessonState::Locked
        }
    }

    /// States for every lesson in the module, in unlock order.
    #[must_use]
    pub fn lesson_states(&self, module: &Module) -> Vec<LessonState> {
        (0..module.len())
            .map(|index| self.state_of(module, index))
            .collect()
    }

    #[must_use]
    pub fn completed_count(&self, module: &Module) -> usize {
        module
            .lessons()
            .iter()
            .filter(|lesson| self.is_completed(lesson.id()))
            .count()
    }

    #[must_use]
    pub fn is_complete(&self, module: &Module) -> bool {
        self.completed_count(module) == module.len()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::ModuleId;
    use crate::model::lesson::LessonContent;
    use crate::time::fixed_now;

    fn build_module() -> Module {
        let lessons = ["l0", "l1", "l2"]
            .iter()
            .map(|id| {
                LessonContent::new(LessonId::new(*id), format!("Lesson {id}"), "Body", 50)
                    .unwrap()
            })
            .collect();
        Module::new(ModuleId::new("m1"), "Budgeting", None, lessons).unwrap()
    }

    #[test]
    fn first_lesson_is_always_unlocked() {
        let module = build_module();
        let progress = ModuleProgress::new();
        assert!(progress.is_unlocked(&module, 0));
    }

    #[test]
    fn later_lessons_start_locked() {
        let module = build_module();
        let progress = ModuleProgress::new();
        assert!(!progress.is_unlocked(&module, 1));
        assert!(!progress.is_unlocked(&module, 2));
    }

    #[test]
    fn completing_a_lesson_unlocks_its_successor_only() {
        let module = build_module();
        let progress = ModuleProgress::from_records(vec![ProgressRecord::completed(
            LessonId::new("l0"),
            fixed_now(),
        )]);

        assert!(progress.is_unlocked(&module, 1));
        assert!(!progress.is_unlocked(&module, 2));
    }

    #[test]
    fn unlock_requires_immediate_predecessor() {
        // Completing l1 without l0 unlocks l2 but not via skip-ahead credit:
        // unlocking looks strictly at the immediate predecessor.
        let module = build_module();
        let progress = ModuleProgress::from_records(vec![ProgressRecord::completed(
            LessonId::new("l1"),
            fixed_now(),
        )]);

        assert!(progress.is_unlocked(&module, 0));
        assert!(!progress.is_unlocked(&module, 1));
        assert!(progress.is_unlocked(&module, 2));
    }

    #[test]
    fn out_of_range_index_is_locked() {
        let module = build_module();
        let progress = ModuleProgress::new();
        assert!(!progress.is_unlocked(&module, 3));
        assert_eq!(progress.state_of(&module, 3), LessonState::Locked);
    }

    #[test]
    fn state_of_reflects_lifecycle() {
        let module = build_module();
        let mut progress = ModuleProgress::new();

        assert_eq!(progress.state_of(&module, 0), LessonState::Unlocked);
        assert_eq!(progress.state_of(&module, 1), LessonState::Locked);

        progress.insert(ProgressRecord::completed(LessonId::new("l0"), fixed_now()));
        assert_eq!(progress.state_of(&module, 0), LessonState::Completed);
        assert_eq!(progress.state_of(&module, 1), LessonState::Unlocked);
        assert_eq!(progress.state_of(&module, 2), LessonState::Locked);
    }

    #[test]
    fn lesson_states_cover_whole_module() {
        let module = build_module();
        let progress = ModuleProgress::from_records(vec![ProgressRecord::completed(
            LessonId::new("l0"),
            fixed_now(),
        )]);

        assert_eq!(
            progress.lesson_states(&module),
            vec![
                LessonState::Completed,
                LessonState::Unlocked,
                LessonState::Locked
            ]
        );
    }

    #[test]
    fn completed_count_and_module_completion() {
        let module = build_module();
        let mut progress = ModuleProgress::new();
        assert_eq!(progress.completed_count(&module), 0);
        assert!(!progress.is_complete(&module));

        for id in ["l0", "l1", "l2"] {
            progress.insert(ProgressRecord::completed(LessonId::new(id), fixed_now()));
        }
        assert_eq!(progress.completed_count(&module), 3);
        assert!(progress.is_complete(&module));
    }
}

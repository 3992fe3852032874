use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use finlit_core::library::ContentLibrary;
use finlit_core::model::{
    LessonId, LessonState, ModuleId, ModuleProgress, QuizOutcome, UserId,
};
use finlit_core::time::Clock;
use storage::repository::{CompletionRecord, ProgressRepository, XpRepository};

use crate::error::ProgressServiceError;
use crate::refresh::RefreshBus;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of recording a lesson completion.
///
/// `awarded_xp` is 0 when the completion was a replay; `total_xp` is the
/// user's running total either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub awarded_xp: u32,
    pub total_xp: u64,
}

/// Result of submitting a quick-check answer.
///
/// `completion` is present only when the answer was correct and so the
/// lesson completion was recorded (possibly as an idempotent replay).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizSubmission {
    pub outcome: QuizOutcome,
    pub completion: Option<CompletionOutcome>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Tracks per-user lesson completion and XP against the content library.
///
/// Unlock decisions themselves are pure (`ModuleProgress`); this service
/// assembles them from persisted rows and owns the one mutating operation,
/// `record_completion`. Idempotence of that operation leans on the
/// uniqueness precondition documented on `ProgressRepository`.
pub struct ProgressService {
    clock: Clock,
    library: Arc<ContentLibrary>,
    progress: Arc<dyn ProgressRepository>,
    xp: Arc<dyn XpRepository>,
    refresh: RefreshBus,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        library: Arc<ContentLibrary>,
        progress: Arc<dyn ProgressRepository>,
        xp: Arc<dyn XpRepository>,
        refresh: RefreshBus,
    ) -> Self {
        Self {
            clock,
            library,
            progress,
            xp,
            refresh,
        }
    }

    #[must_use]
    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    /// Current time according to the service's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Assembles a user's completion map for one module from storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Content` for an unknown module and
    /// `ProgressServiceError::Storage` on storage failures.
    pub async fn module_progress(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
    ) -> Result<ModuleProgress, ProgressServiceError> {
        let module = self.library.module(module_id)?;
        let lesson_ids: Vec<LessonId> = module
            .lessons()
            .iter()
            .map(|lesson| lesson.id().clone())
            .collect();
        let rows = self
            .progress
            .completions_for_lessons(user_id, &lesson_ids)
            .await?;

        Ok(ModuleProgress::from_records(
            rows.into_iter().map(CompletionRecord::into_progress),
        ))
    }

    /// Locked/unlocked/completed state for every lesson of a module, in
    /// unlock order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Content` for an unknown module and
    /// `ProgressServiceError::Storage` on storage failures.
    pub async fn lesson_states(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
    ) -> Result<Vec<LessonState>, ProgressServiceError> {
        let module = self.library.module(module_id)?;
        let progress = self.module_progress(user_id, module_id).await?;
        Ok(progress.lesson_states(module))
    }

    /// Records a lesson completion and awards its XP.
    ///
    /// First completion persists a record, adds the lesson's XP reward to
    /// the user's total, and publishes a refresh event so other mounted
    /// screens refetch. Replaying a completion — a retried request, a
    /// double tap — is a no-op on XP: it returns `awarded_xp = 0` with the
    /// unchanged total and publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Content` if the lesson id resolves to
    /// no known lesson, `ProgressServiceError::Storage` on storage failures.
    pub async fn record_completion(
        &self,
        user_id: &UserId,
        lesson_id: &LessonId,
    ) -> Result<CompletionOutcome, ProgressServiceError> {
        let (_, lesson) = self.library.find_lesson(lesson_id)?;
        let record = CompletionRecord::new(user_id.clone(), lesson_id.clone(), self.clock.now());

        if self.progress.insert_completion(&record).await? {
            let total_xp = self.xp.add_xp(user_id, lesson.xp_reward()).await?;
            tracing::debug!(
                user = %user_id,
                lesson = %lesson_id,
                awarded = lesson.xp_reward(),
                total = total_xp,
                "lesson completed"
            );
            self.refresh.publish();
            Ok(CompletionOutcome {
                awarded_xp: lesson.xp_reward(),
                total_xp,
            })
        } else {
            let total_xp = self.xp.total_xp(user_id).await?;
            Ok(CompletionOutcome {
                awarded_xp: 0,
                total_xp,
            })
        }
    }

    /// Scores a quick-check answer and, when correct, records the lesson
    /// completion.
    ///
    /// An incorrect answer changes nothing; the user may retry.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Content` for unknown module/lesson
    /// ids, `ProgressServiceError::MissingQuiz` if the lesson has no quick
    /// check, `ProgressServiceError::Quiz` for a selection that matches no
    /// option, and `ProgressServiceError::Storage` on storage failures.
    pub async fn submit_quick_check(
        &self,
        user_id: &UserId,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        selected_option_id: &str,
    ) -> Result<QuizSubmission, ProgressServiceError> {
        let lesson = self.library.lesson(module_id, lesson_id)?;
        let quiz = lesson.quiz().ok_or(ProgressServiceError::MissingQuiz)?;
        let outcome = quiz.evaluate(selected_option_id)?;

        let completion = if outcome.is_correct {
            Some(self.record_completion(user_id, lesson_id).await?)
        } else {
            None
        };

        Ok(QuizSubmission {
            outcome,
            completion,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use finlit_core::library::ContentError;
    use finlit_core::model::{
        LessonContent, Module, QuickCheck, QuizError, QuizOption,
    };
    use finlit_core::time::fixed_clock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::repository::InMemoryRepository;

    fn build_library() -> Arc<ContentLibrary> {
        let quiz = QuickCheck::new(
            "Q?",
            vec![
                QuizOption::new("1", "Wrong", false),
                QuizOption::new("3", "Right", true),
            ],
        )
        .unwrap();

        let lessons = vec![
            LessonContent::new(LessonId::new("l0"), "Lesson 0", "Body", 50)
                .unwrap()
                .with_quiz(quiz),
            LessonContent::new(LessonId::new("l1"), "Lesson 1", "Body", 50).unwrap(),
            LessonContent::new(LessonId::new("l2"), "Lesson 2", "Body", 75).unwrap(),
        ];
        let module = Module::new(ModuleId::new("m1"), "Module 1", None, lessons).unwrap();
        Arc::new(ContentLibrary::new(vec![module]).unwrap())
    }

    fn build_service() -> (ProgressService, RefreshBus) {
        let repo = InMemoryRepository::new();
        let refresh = RefreshBus::new();
        let service = ProgressService::new(
            fixed_clock(),
            build_library(),
            Arc::new(repo.clone()),
            Arc::new(repo),
            refresh.clone(),
        );
        (service, refresh)
    }

    #[tokio::test]
    async fn completion_awards_xp_and_unlocks_successor() {
        let (service, _) = build_service();
        let user = UserId::new("u1");
        let module_id = ModuleId::new("m1");

        let before = service.module_progress(&user, &module_id).await.unwrap();
        let module = service.library().module(&module_id).unwrap();
        assert!(!before.is_unlocked(module, 1));

        let outcome = service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome {
                awarded_xp: 50,
                total_xp: 50
            }
        );

        let after = service.module_progress(&user, &module_id).await.unwrap();
        let module = service.library().module(&module_id).unwrap();
        assert!(after.is_unlocked(module, 1));
        assert!(!after.is_unlocked(module, 2));
    }

    #[tokio::test]
    async fn replayed_completion_never_double_counts_xp() {
        let (service, _) = build_service();
        let user = UserId::new("u1");

        let first = service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        assert_eq!(first.awarded_xp, 50);
        assert_eq!(first.total_xp, 50);

        let replay = service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        assert_eq!(replay.awarded_xp, 0);
        assert_eq!(replay.total_xp, 50);
    }

    #[tokio::test]
    async fn unknown_lesson_fails() {
        let (service, _) = build_service();
        let err = service
            .record_completion(&UserId::new("u1"), &LessonId::new("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Content(ContentError::LessonNotFound(_))
        ));
    }

    #[tokio::test]
    async fn first_completion_publishes_refresh_replay_does_not() {
        let (service, refresh) = build_service();
        let user = UserId::new("u1");
        let publishes = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&publishes);
        let _subscription = refresh.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        assert_eq!(publishes.load(Ordering::SeqCst), 1);

        service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        assert_eq!(publishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lesson_states_follow_completion_order() {
        let (service, _) = build_service();
        let user = UserId::new("u1");
        let module_id = ModuleId::new("m1");

        let states = service.lesson_states(&user, &module_id).await.unwrap();
        assert_eq!(
            states,
            vec![
                LessonState::Unlocked,
                LessonState::Locked,
                LessonState::Locked
            ]
        );

        service
            .record_completion(&user, &LessonId::new("l0"))
            .await
            .unwrap();
        let states = service.lesson_states(&user, &module_id).await.unwrap();
        assert_eq!(
            states,
            vec![
                LessonState::Completed,
                LessonState::Unlocked,
                LessonState::Locked
            ]
        );
    }

    #[tokio::test]
    async fn correct_quick_check_answer_completes_lesson() {
        let (service, _) = build_service();
        let user = UserId::new("u1");

        let submission = service
            .submit_quick_check(
                &user,
                &ModuleId::new("m1"),
                &LessonId::new("l0"),
                "3",
            )
            .await
            .unwrap();

        assert!(submission.outcome.is_correct);
        assert_eq!(
            submission.completion,
            Some(CompletionOutcome {
                awarded_xp: 50,
                total_xp: 50
            })
        );
    }

    #[tokio::test]
    async fn incorrect_quick_check_answer_changes_nothing() {
        let (service, _) = build_service();
        let user = UserId::new("u1");

        let submission = service
            .submit_quick_check(
                &user,
                &ModuleId::new("m1"),
                &LessonId::new("l0"),
                "1",
            )
            .await
            .unwrap();

        assert!(!submission.outcome.is_correct);
        assert_eq!(submission.completion, None);

        let states = service
            .lesson_states(&user, &ModuleId::new("m1"))
            .await
            .unwrap();
        assert_eq!(states[0], LessonState::Unlocked);
    }

    #[tokio::test]
    async fn quick_check_rejects_unknown_selection() {
        let (service, _) = build_service();
        let err = service
            .submit_quick_check(
                &UserId::new("u1"),
                &ModuleId::new("m1"),
                &LessonId::new("l0"),
                "9",
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProgressServiceError::Quiz(QuizError::InvalidSelection(_))
        ));
    }

    #[tokio::test]
    async fn quick_check_on_lesson_without_quiz_fails() {
        let (service, _) = build_service();
        let err = service
            .submit_quick_check(
                &UserId::new("u1"),
                &ModuleId::new("m1"),
                &LessonId::new("l1"),
                "1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::MissingQuiz));
    }
}

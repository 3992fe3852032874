use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finlit_core::model::{LessonId, ProgressRecord, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a lesson completion.
///
/// This mirrors the domain `ProgressRecord` so repositories can store rows
/// without leaking storage concerns into the domain layer. A row exists only
/// for completed lessons; absence means "not completed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: UserId,
    pub lesson_id: LessonId,
    pub completed_at: DateTime<Utc>,
}

impl CompletionRecord {
    #[must_use]
    pub fn new(user_id: UserId, lesson_id: LessonId, completed_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            lesson_id,
            completed_at,
        }
    }

    /// Convert the row into a domain `ProgressRecord`.
    #[must_use]
    pub fn into_progress(self) -> ProgressRecord {
        ProgressRecord::completed(self.lesson_id, self.completed_at)
    }
}

/// A user's running XP total, as read back for leaderboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpTotal {
    pub user_id: UserId,
    pub total: u64,
}

/// Repository contract for lesson completions.
///
/// Idempotence precondition: implementations MUST enforce a uniqueness
/// constraint on `(user_id, lesson_id)` and serialize concurrent inserts for
/// the same key, so that exactly one of two racing `insert_completion` calls
/// reports the record as newly inserted. The progress service relies on this
/// to never award XP for the same lesson twice.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Record a completion; returns `true` iff it was newly inserted.
    ///
    /// Replaying an already-recorded completion is not an error — it returns
    /// `false` and leaves the stored row untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn insert_completion(&self, record: &CompletionRecord) -> Result<bool, StorageError>;

    /// Fetch the user's completion rows for the given lessons.
    ///
    /// Lessons without a row are simply absent from the result; that is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn completions_for_lessons(
        &self,
        user_id: &UserId,
        lesson_ids: &[LessonId],
    ) -> Result<Vec<CompletionRecord>, StorageError>;
}

/// Repository contract for XP totals.
#[async_trait]
pub trait XpRepository: Send + Sync {
    /// Atomically add to a user's XP total and return the new total.
    ///
    /// Totals are monotonically non-decreasing; there is no subtraction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the total cannot be updated.
    async fn add_xp(&self, user_id: &UserId, amount: u32) -> Result<u64, StorageError>;

    /// Current XP total; 0 for users with no recorded XP.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn total_xp(&self, user_id: &UserId) -> Result<u64, StorageError>;

    /// Highest totals first, ties broken by user id ascending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn top_totals(&self, limit: u32) -> Result<Vec<XpTotal>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    completions: Arc<Mutex<HashMap<(UserId, LessonId), CompletionRecord>>>,
    totals: Arc<Mutex<HashMap<UserId, u64>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn insert_completion(&self, record: &CompletionRecord) -> Result<bool, StorageError> {
        let mut guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let key = (record.user_id.clone(), record.lesson_id.clone());
        if guard.contains_key(&key) {
            return Ok(false);
        }
        guard.insert(key, record.clone());
        Ok(true)
    }

    async fn completions_for_lessons(
        &self,
        user_id: &UserId,
        lesson_ids: &[LessonId],
    ) -> Result<Vec<CompletionRecord>, StorageError> {
        let guard = self
            .completions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found = Vec::new();
        for lesson_id in lesson_ids {
            if let Some(record) = guard.get(&(user_id.clone(), lesson_id.clone())) {
                found.push(record.clone());
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl XpRepository for InMemoryRepository {
    async fn add_xp(&self, user_id: &UserId, amount: u32) -> Result<u64, StorageError> {
        let mut guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let total = guard.entry(user_id.clone()).or_insert(0);
        *total += u64::from(amount);
        Ok(*total)
    }

    async fn total_xp(&self, user_id: &UserId) -> Result<u64, StorageError> {
        let guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(user_id).copied().unwrap_or(0))
    }

    async fn top_totals(&self, limit: u32) -> Result<Vec<XpTotal>, StorageError> {
        let guard = self
            .totals
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut totals: Vec<XpTotal> = guard
            .iter()
            .map(|(user_id, total)| XpTotal {
                user_id: user_id.clone(),
                total: *total,
            })
            .collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.user_id.cmp(&b.user_id)));
        totals.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(totals)
    }
}

/// Aggregates progress and XP repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub xp: Arc<dyn XpRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let xp: Arc<dyn XpRepository> = Arc::new(repo);
        Self { progress, xp }
    }
}

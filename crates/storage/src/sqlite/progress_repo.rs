use finlit_core::model::{LessonId, UserId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use crate::repository::{CompletionRecord, ProgressRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn insert_completion(&self, record: &CompletionRecord) -> Result<bool, StorageError> {
        // The composite primary key turns a replay into an ignored conflict;
        // rows_affected distinguishes first insert from replay.
        let res = sqlx::query(
            r"
            INSERT INTO completions (user_id, lesson_id, completed_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, lesson_id) DO NOTHING
            ",
        )
        .bind(record.user_id.as_str())
        .bind(record.lesson_id.as_str())
        .bind(record.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.rows_affected() > 0)
    }

    async fn completions_for_lessons(
        &self,
        user_id: &UserId,
        lesson_ids: &[LessonId],
    ) -> Result<Vec<CompletionRecord>, StorageError> {
        let mut found = Vec::with_capacity(lesson_ids.len());
        for lesson_id in lesson_ids {
            let row = sqlx::query(
                r"
                SELECT user_id, lesson_id, completed_at
                FROM completions
                WHERE user_id = ?1 AND lesson_id = ?2
                ",
            )
            .bind(user_id.as_str())
            .bind(lesson_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

            if let Some(row) = row {
                found.push(completion_from_row(&row)?);
            }
        }
        Ok(found)
    }
}

fn completion_from_row(row: &SqliteRow) -> Result<CompletionRecord, StorageError> {
    Ok(CompletionRecord::new(
        UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        LessonId::new(row.try_get::<String, _>("lesson_id").map_err(ser)?),
        row.try_get("completed_at").map_err(ser)?,
    ))
}

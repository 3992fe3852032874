use finlit_core::model::UserId;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{StorageError, XpRepository, XpTotal};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn total_from_i64(raw: i64) -> Result<u64, StorageError> {
    u64::try_from(raw).map_err(|_| StorageError::Serialization("negative xp total".into()))
}

#[async_trait::async_trait]
impl XpRepository for SqliteRepository {
    async fn add_xp(&self, user_id: &UserId, amount: u32) -> Result<u64, StorageError> {
        // Upsert and read-back inside one transaction so the returned total
        // reflects exactly this increment.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO xp_totals (user_id, total)
            VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET total = total + excluded.total
            ",
        )
        .bind(user_id.as_str())
        .bind(i64::from(amount))
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let row = sqlx::query("SELECT total FROM xp_totals WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        total_from_i64(row.try_get::<i64, _>("total").map_err(ser)?)
    }

    async fn total_xp(&self, user_id: &UserId) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT total FROM xp_totals WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => total_from_i64(row.try_get::<i64, _>("total").map_err(ser)?),
            None => Ok(0),
        }
    }

    async fn top_totals(&self, limit: u32) -> Result<Vec<XpTotal>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, total
            FROM xp_totals
            ORDER BY total DESC, user_id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut totals = Vec::with_capacity(rows.len());
        for row in rows {
            totals.push(XpTotal {
                user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
                total: total_from_i64(row.try_get::<i64, _>("total").map_err(ser)?)?,
            });
        }
        Ok(totals)
    }
}

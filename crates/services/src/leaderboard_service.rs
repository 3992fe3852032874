use std::sync::Arc;

use serde::Serialize;

use finlit_core::model::UserId;
use storage::repository::XpRepository;

use crate::error::LeaderboardError;

/// One row of the XP leaderboard. Ranks start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: UserId,
    pub total_xp: u64,
}

/// Ranks users by XP total.
pub struct LeaderboardService {
    xp: Arc<dyn XpRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(xp: Arc<dyn XpRepository>) -> Self {
        Self { xp }
    }

    /// The top `limit` users by XP, highest first; ties keep the storage
    /// layer's deterministic user-id ordering.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` on storage failures.
    pub async fn top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let totals = self.xp.top_totals(limit).await?;
        Ok(totals
            .into_iter()
            .zip(1u32..)
            .map(|(total, rank)| LeaderboardEntry {
                rank,
                user_id: total.user_id,
                total_xp: total.total,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn top_assigns_ranks_from_one() {
        let repo = InMemoryRepository::new();
        repo.add_xp(&UserId::new("alice"), 100).await.unwrap();
        repo.add_xp(&UserId::new("bob"), 250).await.unwrap();
        repo.add_xp(&UserId::new("carol"), 175).await.unwrap();

        let service = LeaderboardService::new(Arc::new(repo));
        let board = service.top(10).await.unwrap();

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].user_id, UserId::new("bob"));
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].user_id, UserId::new("carol"));
        assert_eq!(board[2].rank, 3);
        assert_eq!(board[2].total_xp, 100);
    }

    #[tokio::test]
    async fn top_respects_limit() {
        let repo = InMemoryRepository::new();
        for (user, xp) in [("a", 10), ("b", 20), ("c", 30)] {
            repo.add_xp(&UserId::new(user), xp).await.unwrap();
        }

        let service = LeaderboardService::new(Arc::new(repo));
        let board = service.top(2).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, UserId::new("c"));
    }

    #[tokio::test]
    async fn empty_board_is_fine() {
        let service = LeaderboardService::new(Arc::new(InMemoryRepository::new()));
        assert!(service.top(10).await.unwrap().is_empty());
    }
}

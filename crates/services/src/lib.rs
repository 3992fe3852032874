#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod leaderboard_service;
pub mod progress_service;
pub mod refresh;

pub use finlit_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LeaderboardError, ProgressServiceError};
pub use leaderboard_service::{LeaderboardEntry, LeaderboardService};
pub use progress_service::{CompletionOutcome, ProgressService, QuizSubmission};
pub use refresh::{RefreshBus, RefreshSubscription};

use std::sync::Arc;

use finlit_core::catalog::starter_curriculum;
use finlit_core::library::ContentLibrary;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::progress_service::ProgressService;
use crate::refresh::RefreshBus;

/// Assembles app-facing services around one shared refresh bus.
///
/// The bus is constructed here and injected into every service that
/// publishes or subscribes, so tests can build an isolated instance and
/// production wires a single one through the app context.
#[derive(Clone)]
pub struct AppServices {
    library: Arc<ContentLibrary>,
    refresh: RefreshBus,
    progress: Arc<ProgressService>,
    leaderboard: Arc<LeaderboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(storage, clock))
    }

    /// Build services backed by in-memory storage, mainly for tests.
    #[must_use]
    pub fn new_in_memory(clock: Clock) -> Self {
        Self::assemble(Storage::in_memory(), clock)
    }

    fn assemble(storage: Storage, clock: Clock) -> Self {
        let library = Arc::new(starter_curriculum());
        let refresh = RefreshBus::new();
        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&library),
            Arc::clone(&storage.progress),
            Arc::clone(&storage.xp),
            refresh.clone(),
        ));
        let leaderboard = Arc::new(LeaderboardService::new(Arc::clone(&storage.xp)));

        Self {
            library,
            refresh,
            progress,
            leaderboard,
        }
    }

    #[must_use]
    pub fn library(&self) -> Arc<ContentLibrary> {
        Arc::clone(&self.library)
    }

    #[must_use]
    pub fn refresh(&self) -> RefreshBus {
        self.refresh.clone()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }
}

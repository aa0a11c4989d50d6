// Application state management with singleton pattern

use std::sync::Arc;
use once_cell::sync::Lazy;
use crate::api::blood_pressure::repository::{
    BloodPressureRepository, InMemoryBloodPressureRepository, PgBloodPressureRepository,
};
use crate::api::blood_pressure::service::BloodPressureService;
use crate::config::environment::{EnvironmentVariables, StorageBackend};
use crate::database::DatabaseService;

// AppState singleton
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub database: DatabaseService,
    pub blood_pressures: BloodPressureService,
}

impl AppState {
    /// Builds the state for the given configuration, picking the storage backend it names
    pub fn new(environment: EnvironmentVariables) -> Self {
        let environment_arc: Arc<EnvironmentVariables> = Arc::new(environment);
        let database: DatabaseService = DatabaseService::new(environment_arc.clone());

        let repository: Arc<dyn BloodPressureRepository> = match environment_arc.storage_backend {
            StorageBackend::Memory => Arc::new(InMemoryBloodPressureRepository::new()),
            StorageBackend::Postgres => Arc::new(PgBloodPressureRepository::new(database.clone())),
        };

        Self::with_repository(environment_arc, database, repository)
    }

    /// Builds the state around an already constructed repository
    pub fn with_repository(
        environment: Arc<EnvironmentVariables>,
        database: DatabaseService,
        repository: Arc<dyn BloodPressureRepository>,
    ) -> Self {
        Self {
            environment,
            database,
            blood_pressures: BloodPressureService::new(repository),
        }
    }

    /// Returns the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<AppState> = Lazy::new(|| {
            AppState::new(EnvironmentVariables::instance().clone())
        });
        &INSTANCE
    }

    /// Initializes the backing services (schema creation when running on Postgres)
    pub async fn initialize(&self) -> anyhow::Result<()> {
        if self.environment.storage_backend == StorageBackend::Postgres {
            self.database.initialize().await?;
        }

        tracing::info!(
            storage_backend = ?self.environment.storage_backend,
            "Services initialized successfully"
        );
        Ok(())
    }

    /// Gracefully shutdown all database connections
    pub async fn shutdown(&self) {
        self.database.shutdown().await;
    }
}

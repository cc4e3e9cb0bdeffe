//! Application state management.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::store::{FjallStore, MemoryStore, Movie, MovieError, MovieStore, ObjectId};

use super::config::{Config, DatabaseConfig, StoreEngine};

/// Shared application state.
///
/// Holds the one store handle for the process; cloning shares it.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn MovieStore>,
    read_timeout: Duration,
}

impl AppState {
    /// Wrap an already constructed store.
    pub fn new(store: Arc<dyn MovieStore>, read_timeout: Duration) -> Self {
        Self {
            store,
            read_timeout,
        }
    }

    /// Create a new AppState from configuration, opening the configured store.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let store = Self::open_store(&config.database)?;
        Ok(Self::new(store, config.database.read_timeout()))
    }

    /// The shared movie store.
    pub fn store(&self) -> &dyn MovieStore {
        self.store.as_ref()
    }

    /// Upper bound applied to single-movie lookups.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Look up one movie on the blocking pool, bounded by the read timeout.
    ///
    /// When the timeout fires the lookup keeps running in the background but
    /// the caller gets [`MovieError::Timeout`].
    pub async fn get_movie(&self, id: ObjectId) -> Result<Movie, MovieError> {
        let store = Arc::clone(&self.store);
        let lookup = tokio::task::spawn_blocking(move || store.get_by_id(&id));

        match tokio::time::timeout(self.read_timeout, lookup).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(MovieError::Task(join_err.to_string())),
            Err(_) => Err(MovieError::Timeout(self.read_timeout)),
        }
    }

    /// Flush the store before the process exits.
    pub fn shutdown(&self) -> Result<(), MovieError> {
        debug!("flushing movie store");
        self.store.flush()
    }

    fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn MovieStore>, StateError> {
        match config.engine {
            StoreEngine::Fjall => {
                info!(path = %config.path, collection = %config.collection, "using fjall store");
                let store = FjallStore::open_or_init(&config.path, &config.collection).map_err(
                    |source| StateError::OpenStore {
                        path: config.path.clone(),
                        source,
                    },
                )?;
                Ok(Arc::new(store))
            }
            StoreEngine::Memory => {
                info!("using in-memory store");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open or initialize the on-disk store.
    OpenStore { path: String, source: MovieError },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore { path, source } => {
                write!(f, "Failed to open movie store at '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::OpenStore { source, .. } => Some(source),
        }
    }
}

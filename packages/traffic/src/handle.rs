//! Shared, swappable engine handle.
//!
//! Readers take a snapshot (`Arc<TrafficEngine>`) and query it without
//! holding any lock. A reload builds a complete new engine first and
//! then replaces the shared pointer in one step, so a reader sees either
//! the old engine or the new one, never a partial build.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use street_traffic_models::TrafficConfig;

use crate::engine::TrafficEngine;
use crate::progress::{NullProgress, ProgressCallback};

/// Owns the current engine and the configuration used to rebuild it.
pub struct EngineHandle {
    current: RwLock<Arc<TrafficEngine>>,
    config: TrafficConfig,
}

impl EngineHandle {
    /// Wraps an already-built engine.
    #[must_use]
    pub fn new(engine: TrafficEngine, config: TrafficConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
            config,
        }
    }

    /// Loads the configured dataset and wraps the resulting engine.
    #[must_use]
    pub fn load(config: TrafficConfig) -> Self {
        Self::load_with_progress(config, &NullProgress)
    }

    /// Same as [`Self::load`], reporting progress while reading.
    #[must_use]
    pub fn load_with_progress(config: TrafficConfig, progress: &dyn ProgressCallback) -> Self {
        let engine = TrafficEngine::load_with_progress(&config, progress);
        Self::new(engine, config)
    }

    /// Path of the dataset this handle rebuilds from.
    #[must_use]
    pub fn dataset_path(&self) -> &Path {
        &self.config.dataset_path
    }

    /// The engine currently in service.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TrafficEngine> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Puts `engine` into service and returns the one it replaced.
    pub fn replace(&self, engine: TrafficEngine) -> Arc<TrafficEngine> {
        self.swap(Arc::new(engine))
    }

    /// Rebuilds from the configured dataset and swaps the result in.
    ///
    /// A missing or unreadable dataset swaps in an empty engine, the same
    /// as at startup.
    pub fn reload(&self) -> Arc<TrafficEngine> {
        self.reload_from(&self.config.dataset_path)
    }

    /// Rebuilds from the dataset at `path` and swaps the result in.
    /// Returns the engine built by this call.
    pub fn reload_from(&self, path: &Path) -> Arc<TrafficEngine> {
        log::info!("Rebuilding street index from {}", path.display());
        let engine = Arc::new(TrafficEngine::load_path(path, &self.config, &NullProgress));
        self.swap(Arc::clone(&engine));
        log::info!(
            "Swapped in street index with {} streets",
            engine.index().len()
        );
        engine
    }

    fn swap(&self, engine: Arc<TrafficEngine>) -> Arc<TrafficEngine> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, engine)
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("dataset_path", &self.config.dataset_path)
            .field("streets", &self.snapshot().index().len())
            .finish()
    }
}

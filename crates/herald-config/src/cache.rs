//! Thread-safe configuration caching with arc-swap for lock-free reads.

use crate::loader::ConfigLoader;
use crate::schema::Config;
use arc_swap::ArcSwap;
use herald_common::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Thread-safe configuration cache using arc-swap for lock-free reads.
///
/// Every dispatch reads the live configuration through here, so a reload is picked up
/// by the next event without restarting the gateway.
pub struct ConfigCache {
    config: ArcSwap<Config>,
    generation: AtomicU64,
}

impl ConfigCache {
    /// Creates a new configuration cache with the given initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            generation: AtomicU64::new(0),
        }
    }

    /// Gets the current configuration.
    pub fn get(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Number of successful updates since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Updates the configuration atomically.
    pub fn update(&self, config: Config) {
        self.config.store(Arc::new(config));
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Reloads from `loader`; the cached value is only replaced when loading and validation succeed.
    pub async fn reload(&self, loader: &ConfigLoader) -> Result<()> {
        let config = loader.load().await?;
        self.update(config);
        info!(path = %loader.path().display(), generation = self.generation(), "Configuration reloaded");
        Ok(())
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

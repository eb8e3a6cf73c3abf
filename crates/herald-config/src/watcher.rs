//! File watching for configuration hot-reload.

use crate::cache::ConfigCache;
use crate::loader::ConfigLoader;
use herald_common::{HeraldError, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Quiet period that coalesces the burst of events editors emit on save.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches the configuration file and reloads the cache when it changes.
///
/// Dropping the watcher stops both the OS watch and the reload task.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Starts watching the loader's file. Must be called from within a tokio runtime.
    pub fn spawn(loader: ConfigLoader, cache: Arc<ConfigCache>) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let file_name = loader.path().file_name().map(std::ffi::OsStr::to_os_string);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event)
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == file_name.as_deref()) =>
                {
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => error!("Config watcher error: {e}"),
            }
        })
        .map_err(|e| HeraldError::Config(format!("failed to create config watcher: {e}")))?;

        // Watch the parent directory: atomic saves replace the file, which drops a direct watch.
        let target = loader
            .path()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| std::path::PathBuf::from("."), std::path::Path::to_path_buf);
        watcher
            .watch(&target, RecursiveMode::NonRecursive)
            .map_err(|e| HeraldError::Config(format!("failed to watch {}: {e}", target.display())))?;

        let task = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                debug!(path = %loader.path().display(), "Config change detected");
                if let Err(e) = cache.reload(&loader).await {
                    error!("Keeping previous configuration, reload failed: {e}");
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

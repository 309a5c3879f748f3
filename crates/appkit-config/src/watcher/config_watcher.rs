//! Debounced watcher for a single config file.

use appkit_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Quiet period after the last filesystem event before a reload is signalled.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches a config file for changes and sends notifications.
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new watcher for the given config file path.
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(
                "config file {} does not exist yet, will watch for creation",
                path.display()
            );
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Watch the config file, sending `()` on `tx` after each debounced change.
    ///
    /// The parent directory is watched rather than the file itself so that
    /// editors that save via write + rename are still picked up. Runs until
    /// the underlying notify channel closes.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let watch_dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.path.clone());
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();

        info!("starting config file watcher for {}", self.path.display());

        // Bridges the sync notify callback into async.
        let (notify_tx, mut notify_rx) = mpsc::channel::<()>(16);
        let _watcher = spawn_notify_watcher(&watch_dir, file_name, notify_tx)?;

        loop {
            if notify_rx.recv().await.is_none() {
                break;
            }

            // Coalesce bursts: restart the quiet period on every new event.
            let debounce = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(debounce);
            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                        debounce.as_mut().reset(tokio::time::Instant::now() + DEBOUNCE);
                    }
                }
            }

            info!("config file changed, sending reload signal");
            if tx.send(()).is_err() {
                debug!("no receivers for config reload signal");
            }
        }

        Ok(())
    }
}

fn spawn_notify_watcher(
    watch_dir: &Path,
    file_name: OsString,
    notify_tx: mpsc::Sender<()>,
) -> Result<RecommendedWatcher, ConfigError> {
    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| match result {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let is_our_file = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n == file_name).unwrap_or(false));
                if is_our_file {
                    debug!("config file change detected");
                    let _ = notify_tx.try_send(());
                }
            }
            Err(e) => {
                error!("file watcher error: {e}");
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| {
            ConfigError::WatchError(format!("failed to watch {}: {e}", watch_dir.display()))
        })?;

    Ok(watcher)
}

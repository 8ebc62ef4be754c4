//! File watching for sheet hot-reload.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use crate::rules::StyleSheetProvider;
use crate::tokens::TokenStore;
use crate::{Error, Result};

/// Event indicating a sheet file changed.
#[derive(Debug, Clone)]
pub struct SheetChangeEvent {
    /// Path to the changed file.
    pub path: PathBuf,
    /// Type of change.
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created or modified.
    Modified,
    /// File was removed.
    Removed,
}

/// Watches `.css` files, individually or by directory, for changes.
///
/// # Example
///
/// ```ignore
/// let provider = DirectorySheetProvider::new("dist");
/// let mut watcher = SheetWatcher::new()?;
/// watcher.watch_dir(provider.root())?;
///
/// // In the host loop:
/// let changes = watcher.poll();
/// if !changes.is_empty() {
///     let reloaded = watcher.apply_changes(&mut store, &provider, &changes)?;
/// }
/// ```
pub struct SheetWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<std::result::Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    watched_files: HashSet<PathBuf>,
    watched_dirs: HashSet<PathBuf>,
}

impl SheetWatcher {
    /// Create a new watcher.
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(Duration::from_millis(100), tx)
            .map_err(|e| Error::HotReload(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_files: HashSet::new(),
            watched_dirs: HashSet::new(),
        })
    }

    /// Start watching a single sheet file.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_files.contains(&path) {
            self.debouncer
                .watcher()
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|e| Error::HotReload(e.to_string()))?;

            self.watched_files.insert(path.clone());
            tracing::info!("Watching sheet: {}", path.display());
        }

        Ok(())
    }

    /// Start watching every `.css` file below a directory.
    pub fn watch_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(dir.as_ref(), e))?;

        if !self.watched_dirs.contains(&dir) {
            self.debouncer
                .watcher()
                .watch(&dir, RecursiveMode::Recursive)
                .map_err(|e| Error::HotReload(e.to_string()))?;

            self.watched_dirs.insert(dir.clone());
            tracing::info!("Watching sheet directory: {}", dir.display());
        }

        Ok(())
    }

    /// Stop watching a file or directory.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = match path.as_ref().canonicalize() {
            Ok(p) => p,
            Err(_) => return Ok(()),
        };

        if self.watched_files.remove(&path) || self.watched_dirs.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            tracing::info!("Stopped watching: {}", path.display());
        }

        Ok(())
    }

    fn is_watched(&self, path: &Path) -> bool {
        if self.watched_files.contains(path) {
            return true;
        }
        path.extension().is_some_and(|ext| ext == "css")
            && self.watched_dirs.iter().any(|dir| path.starts_with(dir))
    }

    /// Poll for sheet changes.
    ///
    /// Returns each changed file once. Call this from the host loop.
    pub fn poll(&mut self) -> Vec<SheetChangeEvent> {
        let mut changes = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.kind != DebouncedEventKind::Any || !self.is_watched(&event.path) {
                            continue;
                        }
                        let kind = if event.path.exists() {
                            ChangeKind::Modified
                        } else {
                            ChangeKind::Removed
                        };
                        changes.push(SheetChangeEvent {
                            path: event.path,
                            kind,
                        });
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!("File watcher error: {}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("File watcher disconnected");
                    break;
                }
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);

        changes
    }

    /// Rescan the provider after changes, returning the reloaded sheet names.
    ///
    /// Removed files are only logged: registered sheets stay for the session.
    pub fn apply_changes<P: StyleSheetProvider + ?Sized>(
        &self,
        store: &mut TokenStore,
        provider: &P,
        changes: &[SheetChangeEvent],
    ) -> Result<Vec<String>> {
        if changes.is_empty() {
            return Ok(vec![]);
        }

        for change in changes.iter().filter(|c| c.kind == ChangeKind::Removed) {
            tracing::info!("Sheet removed, keeping last version: {}", change.path.display());
        }

        let reloaded = store.register_sheets(provider)?;
        tracing::info!("Rescanned sheets after {} change(s)", changes.len());
        Ok(reloaded)
    }

    /// Get the number of watched files and directories.
    pub fn watched_count(&self) -> usize {
        self.watched_files.len() + self.watched_dirs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DirectorySheetProvider;
    use std::fs;

    use tempfile::tempdir;

    #[test]
    fn watcher_creation() {
        assert!(SheetWatcher::new().is_ok());
    }

    #[test]
    fn watch_and_unwatch() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("spectrum-global.css");
        fs::write(&file_path, ":root { --a: 1px; }").unwrap();

        let mut watcher = SheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        watcher.watch_dir(dir.path()).unwrap();
        assert_eq!(watcher.watched_count(), 2);

        watcher.unwatch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);
    }

    #[test]
    fn apply_changes_rescans_provider() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("spectrum-global.css");
        fs::write(&file_path, ":root { --a: 1px; }").unwrap();

        let provider = DirectorySheetProvider::new(dir.path());
        let mut store = TokenStore::new("spectrum").unwrap();
        store.register_sheets(&provider).unwrap();

        fs::write(&file_path, ":root { --a: 2px; }").unwrap();
        let watcher = SheetWatcher::new().unwrap();
        let change = SheetChangeEvent {
            path: file_path,
            kind: ChangeKind::Modified,
        };

        let reloaded = watcher.apply_changes(&mut store, &provider, &[change]).unwrap();
        assert_eq!(reloaded, vec!["global"]);
        assert_eq!(store.all_tokens().get("--a"), Some("2px"));
    }
}

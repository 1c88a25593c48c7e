//! File system watcher for the watch root.

use crate::error::{IngestError, IngestResult};
use docsum_config::Config;
use glob::Pattern;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A file appeared directly in the watch root and has stopped changing.
    FileCreated { path: PathBuf },
    /// An error occurred.
    Error(String),
}

/// Configuration for the file watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// The watch root. Only its direct children are reported.
    pub directory: PathBuf,
    /// Patterns to ignore.
    pub ignore_patterns: Vec<Pattern>,
    /// Quiet period before a file counts as fully written.
    pub debounce: Duration,
}

impl WatcherConfig {
    /// Create from config.
    pub fn from_config(config: &Config) -> Self {
        let ignore_patterns = config
            .watch
            .ignore_patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            directory: config.watch_directory(),
            ignore_patterns,
            debounce: Duration::from_millis(config.watch.debounce_ms.max(1)),
        }
    }
}

/// File system watcher for detecting new files.
pub struct FileWatcher {
    config: WatcherConfig,
    root: PathBuf,
    /// Paths already emitted and still present in the root.
    seen: HashSet<PathBuf>,
    debouncer: Debouncer<RecommendedWatcher>,
    receiver: Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
}

impl FileWatcher {
    /// Create a new file watcher.
    pub fn new(config: WatcherConfig) -> IngestResult<Self> {
        let (tx, rx) = channel();

        let debouncer =
            new_debouncer(config.debounce, tx).map_err(|e| IngestError::Watch(e.to_string()))?;

        Ok(Self {
            root: config.directory.clone(),
            seen: HashSet::new(),
            config,
            debouncer,
            receiver: rx,
        })
    }

    /// Start watching the root. Subfolders are not watched.
    pub fn start(&mut self) -> IngestResult<()> {
        let dir = &self.config.directory;
        if !dir.is_dir() {
            return Err(IngestError::Watch(format!(
                "Watch directory does not exist: {}",
                dir.display()
            )));
        }

        // Events may carry the resolved path (e.g. through symlinks).
        self.root = dir.canonicalize().unwrap_or_else(|_| dir.clone());

        info!("Watching directory: {:?}", dir);
        self.debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| IngestError::Watch(e.to_string()))?;

        Ok(())
    }

    /// Wait for the next debounced batch (blocking).
    ///
    /// Returns `None` once the watcher has shut down. A batch may be empty
    /// when every event in it was filtered out.
    pub fn next_events(&mut self) -> Option<Vec<WatchEvent>> {
        match self.receiver.recv() {
            Ok(Ok(debounced_events)) => Some(
                debounced_events
                    .into_iter()
                    .filter_map(|event| self.accept(event.path, event.kind))
                    .collect(),
            ),
            Ok(Err(e)) => {
                error!("Watch error: {:?}", e);
                Some(vec![WatchEvent::Error(e.to_string())])
            }
            Err(_) => None,
        }
    }

    /// Forward accepted paths into `sender` from a dedicated thread.
    ///
    /// The thread exits when the watcher stops or the receiving side closes.
    pub fn spawn_forwarder(mut self, sender: mpsc::Sender<PathBuf>) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            while let Some(events) = self.next_events() {
                for event in events {
                    match event {
                        WatchEvent::FileCreated { path } => {
                            if sender.blocking_send(path).is_err() {
                                info!("Ingest queue closed, stopping watcher");
                                return;
                            }
                        }
                        WatchEvent::Error(e) => warn!("Watcher reported an error: {}", e),
                    }
                }
            }
            debug!("Watcher channel closed");
        })
    }

    /// Decide whether a debounced event is a new file to ingest.
    ///
    /// The debouncer does not distinguish creation from modification, so a
    /// path is emitted once and not again until it has left the root.
    fn accept(&mut self, path: PathBuf, kind: DebouncedEventKind) -> Option<WatchEvent> {
        if kind != DebouncedEventKind::Any {
            return None;
        }

        if !self.is_direct_child(&path) {
            return None;
        }

        // Files already moved away
        if !path.exists() {
            self.seen.remove(&path);
            return None;
        }

        if !path.is_file() {
            return None;
        }

        if should_ignore_path(&path, &self.config.ignore_patterns) {
            debug!("Ignoring file: {:?}", path);
            return None;
        }

        if !self.seen.insert(path.clone()) {
            debug!("Already handed off, ignoring change to {:?}", path);
            return None;
        }

        info!("New file: {:?}", path);
        Some(WatchEvent::FileCreated { path })
    }

    fn is_direct_child(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => parent == self.root || parent == self.config.directory,
            None => false,
        }
    }
}

fn should_ignore_path(path: &Path, patterns: &[Pattern]) -> bool {
    if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
        // Ignore hidden files
        if filename.starts_with('.') {
            return true;
        }

        for pattern in patterns {
            if pattern.matches(filename) {
                return true;
            }
        }
    }

    false
}

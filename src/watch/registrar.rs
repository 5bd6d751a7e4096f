// src/watch/registrar.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::plugin::collector::DependencyCollector;

/// Directories implied by the resolver's patterns that have not yet been
/// handed to the build tool.
///
/// Registration happens while patterns are scanned (possibly from blocking
/// pool workers); draining happens on the build lifecycle callback.
#[derive(Debug, Default)]
pub struct WatchRegistrar {
    directories: Mutex<BTreeSet<PathBuf>>,
}

impl WatchRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    // The set only holds plain paths, so a panic while it was locked cannot
    // have left it half-updated.
    fn lock(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.directories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `directory` if absent. Returns true if it was newly added.
    pub fn register(&self, directory: impl AsRef<Path>) -> bool {
        let directory = directory.as_ref();
        let added = self.lock().insert(directory.to_path_buf());
        if added {
            debug!(?directory, "registered context directory");
        }
        added
    }

    /// Hand every registered directory to `collector` and clear the set.
    ///
    /// Draining an empty registrar does not touch the collector. Returns the
    /// number of directories handed over.
    pub fn drain_into(&self, collector: &mut dyn DependencyCollector) -> usize {
        let drained: Vec<PathBuf> = std::mem::take(&mut *self.lock()).into_iter().collect();
        if drained.is_empty() {
            return 0;
        }

        let count = drained.len();
        debug!(count, "draining context directories into build dependencies");
        collector.add_all(drained);
        count
    }

    /// Current contents, sorted.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

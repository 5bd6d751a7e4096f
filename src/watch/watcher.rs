// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;

/// Files were added, removed or renamed under a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralChange {
    pub paths: Vec<PathBuf>,
}

/// True for events that can change which files a glob matches. Content
/// edits are ignored.
pub fn is_structural(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle will
/// stop file watching.
pub struct WatcherHandle {
    inner: RecommendedWatcher,
    /// Directories watched recursively.
    watched: BTreeSet<PathBuf>,
    /// Existing ancestors of missing directories, watched non-recursively
    /// until the directory itself appears.
    stand_ins: BTreeSet<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("watched", &self.watched)
            .field("stand_ins", &self.stand_ins)
            .finish()
    }
}

impl WatcherHandle {
    /// Start watching any of `dirs` not watched yet.
    ///
    /// A directory that does not exist yet is covered by watching its nearest
    /// existing ancestor, so its creation shows up as a change. Pass the same
    /// directories again after that change to watch them directly.
    ///
    /// Returns how many watches were added.
    pub fn watch_dirs<I>(&mut self, dirs: I) -> Result<usize>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut added = 0;
        for dir in dirs {
            match plan_watch(&dir, &self.watched, &self.stand_ins) {
                WatchPlan::Covered => {}
                WatchPlan::Directory => {
                    if self.stand_ins.remove(&dir) {
                        self.inner.unwatch(&dir)?;
                    }
                    self.inner.watch(&dir, RecursiveMode::Recursive)?;
                    info!("watching {:?}", dir);
                    self.watched.insert(dir);
                    added += 1;
                }
                WatchPlan::StandIn(ancestor) => {
                    self.inner.watch(&ancestor, RecursiveMode::NonRecursive)?;
                    info!("watching {:?} until {:?} exists", ancestor, dir);
                    self.stand_ins.insert(ancestor);
                    added += 1;
                }
                WatchPlan::Nothing => {
                    debug!(?dir, "no existing ancestor to watch");
                }
            }
        }
        Ok(added)
    }

    pub fn watched(&self) -> impl Iterator<Item = &PathBuf> {
        self.watched.iter()
    }

    pub fn stand_ins(&self) -> impl Iterator<Item = &PathBuf> {
        self.stand_ins.iter()
    }
}

/// How a directory handed to [`WatcherHandle::watch_dirs`] gets watched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchPlan {
    /// Already inside a recursively watched directory, or its stand-in is
    /// already in place.
    Covered,
    /// Watch the directory itself, recursively.
    Directory,
    /// The directory is missing; watch this existing ancestor instead.
    StandIn(PathBuf),
    /// Neither the directory nor any ancestor exists.
    Nothing,
}

fn plan_watch(dir: &Path, watched: &BTreeSet<PathBuf>, stand_ins: &BTreeSet<PathBuf>) -> WatchPlan {
    if watched.iter().any(|w| dir.starts_with(w)) {
        return WatchPlan::Covered;
    }
    if dir.is_dir() {
        return WatchPlan::Directory;
    }
    match dir.ancestors().skip(1).find(|a| a.is_dir()) {
        Some(a) if stand_ins.contains(a) || watched.iter().any(|w| a.starts_with(w)) => {
            WatchPlan::Covered
        }
        Some(a) => WatchPlan::StandIn(a.to_path_buf()),
        None => WatchPlan::Nothing,
    }
}

/// Spawn a filesystem watcher that sends a [`StructuralChange`] on
/// `changes_tx` whenever files appear in, disappear from or are renamed
/// within a watched directory.
///
/// The watcher starts with nothing watched; add directories with
/// [`WatcherHandle::watch_dirs`]. Must be called within a tokio runtime.
pub fn spawn_watcher(changes_tx: mpsc::Sender<StructuralChange>) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("glob-entries: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("glob-entries: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_structural(&event.kind) {
                continue;
            }
            debug!(?event, "structural change");
            let change = StructuralChange { paths: event.paths };
            if changes_tx.send(change).await.is_err() {
                warn!("change receiver dropped; stopping watcher loop");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        inner: watcher,
        watched: BTreeSet::new(),
        stand_ins: BTreeSet::new(),
    })
}

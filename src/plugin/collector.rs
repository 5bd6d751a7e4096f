// src/plugin/collector.rs

//! Strategies for adding directories to a build's context dependencies.
//!
//! Build tools expose context dependencies in one of two shapes:
//! - a mutable set with an `add`-style operation (newer hosts);
//! - an immutable sequence that can only be replaced by a concatenated copy
//!   (older hosts).
//!
//! [`ContextDependencies`] is the shape a [`Compilation`](super::host::Compilation)
//! exposes; [`ContextDependencies::collector`] picks the matching strategy.

use std::collections::HashSet;
use std::path::PathBuf;

/// Something that accepts directories as build dependencies.
pub trait DependencyCollector {
    fn add_all(&mut self, directories: Vec<PathBuf>);
}

/// Set-style collection: each directory is added in place.
#[derive(Debug)]
pub struct MutableSet<'a> {
    set: &'a mut HashSet<PathBuf>,
}

impl<'a> MutableSet<'a> {
    pub fn new(set: &'a mut HashSet<PathBuf>) -> Self {
        Self { set }
    }
}

impl DependencyCollector for MutableSet<'_> {
    fn add_all(&mut self, directories: Vec<PathBuf>) {
        for directory in directories {
            self.set.insert(directory);
        }
    }
}

/// Sequence-style collection: the host's slot is replaced by a new sequence
/// holding the old elements followed by the new directories.
#[derive(Debug)]
pub struct AppendOnlySequence<'a> {
    slot: &'a mut Vec<PathBuf>,
}

impl<'a> AppendOnlySequence<'a> {
    pub fn new(slot: &'a mut Vec<PathBuf>) -> Self {
        Self { slot }
    }
}

impl DependencyCollector for AppendOnlySequence<'_> {
    fn add_all(&mut self, directories: Vec<PathBuf>) {
        let concatenated: Vec<PathBuf> = self.slot.iter().cloned().chain(directories).collect();
        *self.slot = concatenated;
    }
}

/// Context dependencies as exposed by a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextDependencies {
    /// Older hosts: a plain sequence, replaced on every update.
    Sequence(Vec<PathBuf>),
    /// Newer hosts: a set with in-place insertion.
    Set(HashSet<PathBuf>),
}

impl Default for ContextDependencies {
    fn default() -> Self {
        ContextDependencies::Set(HashSet::new())
    }
}

impl ContextDependencies {
    /// Strategy matching this shape.
    pub fn collector(&mut self) -> Box<dyn DependencyCollector + '_> {
        match self {
            ContextDependencies::Sequence(seq) => Box::new(AppendOnlySequence::new(seq)),
            ContextDependencies::Set(set) => Box::new(MutableSet::new(set)),
        }
    }

    pub fn contains(&self, directory: &std::path::Path) -> bool {
        match self {
            ContextDependencies::Sequence(seq) => seq.iter().any(|d| d == directory),
            ContextDependencies::Set(set) => set.contains(directory),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ContextDependencies::Sequence(seq) => seq.len(),
            ContextDependencies::Set(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All directories, sorted and deduplicated.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = match self {
            ContextDependencies::Sequence(seq) => seq.clone(),
            ContextDependencies::Set(set) => set.iter().cloned().collect(),
        };
        dirs.sort();
        dirs.dedup();
        dirs
    }
}

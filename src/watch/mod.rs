// src/watch/mod.rs

//! Directory tracking for watch mode.
//!
//! This module is responsible for:
//! - Accumulating the parent directories of resolved patterns until the
//!   build tool collects them as context dependencies.
//! - Wiring up a cross-platform filesystem watcher (`notify`) on those
//!   directories for the CLI's `--watch` mode.
//! - Rebuilding after a change. A failed rebuild is reported and watching
//!   carries on.
//!
//! It does **not** decide entry names; it only reports that the set of files
//! under a watched directory changed.

pub mod rebuild;
pub mod registrar;
pub mod watcher;

pub use rebuild::{rebuild, Rebuild};
pub use registrar::WatchRegistrar;
pub use watcher::{spawn_watcher, StructuralChange, WatcherHandle};

// src/glob/mod.rs

//! Glob matching.
//!
//! This module is responsible for:
//! - Deriving the literal parent directory of a pattern.
//! - Compiling patterns with `globset`.
//! - Walking the filesystem from the parent directory and listing matches.
//!
//! It knows nothing about entry names or build tools.

pub mod engine;
pub mod parent;
pub mod path_utils;

pub use engine::{FsGlobEngine, GlobEngine, GlobOptions, GlobPattern};
pub use parent::glob_parent;

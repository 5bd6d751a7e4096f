// src/entries/mod.rs

//! Entry resolution: glob patterns → bundler entry mapping.
//!
//! A [`Resolver`] compiles its patterns once. Every call of its mapping
//! operation rescans the filesystem, so the mapping always reflects the files
//! present at call time, and registers each pattern's parent directory with
//! the resolver's [`WatchRegistrar`](crate::watch::WatchRegistrar).

pub mod naming;
pub mod options;
pub mod patterns;
pub mod resolver;

pub use naming::default_entry_name;
pub use options::{EntryMap, EntryValue, FilterFn, MapEntryFn, MapEntryNameFn, ResolverOptions};
pub use patterns::Patterns;
pub use resolver::{EntriesFn, EntriesFuture, Resolver};

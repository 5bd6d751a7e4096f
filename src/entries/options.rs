// src/entries/options.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{GlobEntriesError, Result};
use crate::glob::{GlobEngine, GlobOptions};

/// `filter(file, index)`: keep `file` when true. `index` is the file's
/// position in its pattern's match list.
pub type FilterFn = Arc<dyn Fn(&Path, usize) -> bool + Send + Sync>;

/// `map_entry_name(file, parent)`: custom entry name.
pub type MapEntryNameFn = Arc<dyn Fn(&Path, &Path) -> String + Send + Sync>;

/// `map_entry(file, parent)`: custom entry value.
pub type MapEntryFn = Arc<dyn Fn(&Path, &Path) -> EntryValue + Send + Sync>;

/// Value of one bundler entry: a single module path or several modules
/// bundled under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Single(String),
    Many(Vec<String>),
}

impl EntryValue {
    /// Reject empty strings, empty lists and lists containing empty strings.
    pub fn validate(&self) -> Result<()> {
        let valid = match self {
            EntryValue::Single(s) => !s.is_empty(),
            EntryValue::Many(items) => !items.is_empty() && items.iter().all(|s| !s.is_empty()),
        };
        if valid {
            Ok(())
        } else {
            Err(GlobEntriesError::invalid_argument(
                "map_entry must return a non-empty string or a list of non-empty strings",
            ))
        }
    }
}

impl From<&str> for EntryValue {
    fn from(s: &str) -> Self {
        EntryValue::Single(s.to_string())
    }
}

impl From<String> for EntryValue {
    fn from(s: String) -> Self {
        EntryValue::Single(s)
    }
}

impl From<&Path> for EntryValue {
    fn from(p: &Path) -> Self {
        EntryValue::Single(p.to_string_lossy().into_owned())
    }
}

impl From<Vec<String>> for EntryValue {
    fn from(items: Vec<String>) -> Self {
        EntryValue::Many(items)
    }
}

impl From<Vec<&str>> for EntryValue {
    fn from(items: Vec<&str>) -> Self {
        EntryValue::Many(items.into_iter().map(str::to_string).collect())
    }
}

/// Entry name → entry value, as consumed by a multi-entry bundler config.
pub type EntryMap = BTreeMap<String, EntryValue>;

/// Configuration for a [`Resolver`](super::Resolver).
///
/// ```ignore
/// let options = ResolverOptions::new()
///     .with_filter(|file, _| !file.to_string_lossy().ends_with(".test.js"))
///     .with_map_entry_name(|file, _parent| file.file_stem().unwrap().to_string_lossy().into())
///     .with_seed([("vendor", "./vendor.js")]);
/// ```
#[derive(Clone, Default)]
pub struct ResolverOptions {
    pub filter: Option<FilterFn>,
    pub map_entry_name: Option<MapEntryNameFn>,
    pub map_entry: Option<MapEntryFn>,
    /// Base mapping; resolved entries overwrite seed entries with the same
    /// name.
    pub seed: EntryMap,
    /// Passed through to the glob engine.
    pub glob: GlobOptions,
    /// Glob engine override. Defaults to the `std::fs` backed engine.
    pub engine: Option<Arc<dyn GlobEngine>>,
}

impl fmt::Debug for ResolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverOptions")
            .field("filter", &self.filter.is_some())
            .field("map_entry_name", &self.map_entry_name.is_some())
            .field("map_entry", &self.map_entry.is_some())
            .field("seed", &self.seed)
            .field("glob", &self.glob)
            .field("engine", &self.engine)
            .finish()
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path, usize) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn with_map_entry_name<F>(mut self, map: F) -> Self
    where
        F: Fn(&Path, &Path) -> String + Send + Sync + 'static,
    {
        self.map_entry_name = Some(Arc::new(map));
        self
    }

    pub fn with_map_entry<F, V>(mut self, map: F) -> Self
    where
        F: Fn(&Path, &Path) -> V + Send + Sync + 'static,
        V: Into<EntryValue>,
    {
        self.map_entry = Some(Arc::new(move |file: &Path, parent: &Path| -> EntryValue {
            map(file, parent).into()
        }));
        self
    }

    pub fn with_seed<I, K, V>(mut self, seed: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<EntryValue>,
    {
        self.seed = seed
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_glob(mut self, glob: GlobOptions) -> Self {
        self.glob = glob;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn GlobEngine>) -> Self {
        self.engine = Some(engine);
        self
    }
}

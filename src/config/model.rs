// src/config/model.rs

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::entries::{EntryMap, Patterns, ResolverOptions};
use crate::errors::{GlobEntriesError, Result};
use crate::glob::path_utils::relative_str;
use crate::glob::GlobOptions;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// patterns = ["src/pages/**/*.js", "src/widgets/*.js"]
/// exclude = ["**/*.test.js"]
///
/// [glob]
/// cwd = "."
/// dot = false
///
/// [seed]
/// vendor = "./vendor/index.js"
/// polyfills = ["./a.js", "./b.js"]
/// ```
///
/// `patterns` is kept untyped here so that a wrong type can be reported as
/// an invalid argument rather than a generic TOML error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// A glob string or an array of glob strings.
    #[serde(default)]
    pub patterns: Option<toml::Value>,

    /// Globs (relative to `glob.cwd`) whose matches are left out.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Options passed through to the glob engine.
    #[serde(default)]
    pub glob: GlobOptions,

    /// Entries present before any pattern is resolved.
    #[serde(default)]
    pub seed: EntryMap,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub patterns: Patterns,
    pub exclude: Vec<String>,
    pub glob: GlobOptions,
    pub seed: EntryMap,
}

impl ConfigFile {
    /// Only constructed through validation (`TryFrom<RawConfigFile>`).
    pub(crate) fn new_unchecked(
        patterns: Patterns,
        exclude: Vec<String>,
        glob: GlobOptions,
        seed: EntryMap,
    ) -> Self {
        Self {
            patterns,
            exclude,
            glob,
            seed,
        }
    }

    /// Resolver options for this config. `exclude` becomes the `filter`.
    pub fn resolver_options(&self) -> Result<ResolverOptions> {
        let mut options = ResolverOptions::new()
            .with_glob(self.glob.clone())
            .with_seed(self.seed.clone());

        if !self.exclude.is_empty() {
            let exclude = build_exclude_set(&self.exclude)?;
            let cwd = self.glob.effective_cwd()?;
            options = options.with_filter(move |file: &Path, _index| {
                let candidate = relative_str(&cwd, file)
                    .unwrap_or_else(|| file.to_string_lossy().replace('\\', "/"));
                !exclude.is_match(&candidate)
            });
        }

        Ok(options)
    }
}

/// Build a GlobSet from exclude patterns.
pub(crate) fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).map_err(|e| {
            GlobEntriesError::invalid_argument(format!("invalid exclude pattern `{pat}`: {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| GlobEntriesError::invalid_argument(format!("building exclude set: {e}")))
}

// src/entries/resolver.rs

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, trace};

use crate::entries::naming::{entry_name, entry_value};
use crate::entries::options::{EntryMap, ResolverOptions};
use crate::entries::patterns::Patterns;
use crate::errors::{GlobEntriesError, Result};
use crate::glob::path_utils::absolutize;
use crate::glob::{FsGlobEngine, GlobEngine, GlobPattern};
use crate::watch::WatchRegistrar;

/// Resolves glob patterns into a bundler entry mapping and remembers the
/// directories those patterns depend on.
///
/// Cloning is cheap: clones share the compiled patterns and the same
/// [`WatchRegistrar`], so the mapping callable and the build-tool plugin can
/// be handed out separately.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<Inner>,
}

struct Inner {
    patterns: Vec<GlobPattern>,
    options: ResolverOptions,
    cwd: PathBuf,
    engine: Arc<dyn GlobEngine>,
    registrar: WatchRegistrar,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("patterns", &self.inner.patterns)
            .field("cwd", &self.inner.cwd)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Compile `patterns` and fix the working directory.
    ///
    /// Fails with `InvalidArgument` if any pattern is empty or not a valid
    /// glob.
    pub fn new(patterns: impl Into<Patterns>, options: ResolverOptions) -> Result<Self> {
        let patterns = patterns.into();
        let compiled = patterns
            .as_slice()
            .iter()
            .map(|p| GlobPattern::new(p, &options.glob))
            .collect::<Result<Vec<_>>>()?;

        let cwd = options.glob.effective_cwd()?;
        let engine = options
            .engine
            .clone()
            .unwrap_or_else(|| Arc::new(FsGlobEngine::default()));

        debug!(patterns = ?patterns.as_slice(), ?cwd, "resolver created");

        Ok(Self {
            inner: Arc::new(Inner {
                patterns: compiled,
                options,
                cwd,
                engine,
                registrar: WatchRegistrar::new(),
            }),
        })
    }

    pub fn patterns(&self) -> &[GlobPattern] {
        &self.inner.patterns
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.inner.options
    }

    /// Absolute base directory for relative patterns.
    pub fn cwd(&self) -> &Path {
        &self.inner.cwd
    }

    pub fn registrar(&self) -> &WatchRegistrar {
        &self.inner.registrar
    }

    /// Absolute parent directory of every pattern, in pattern order, without
    /// duplicates. Does not register anything.
    pub fn parent_directories(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for pattern in &self.inner.patterns {
            let dir = self.inner.parent_dir(pattern);
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    fn register_parents(&self) {
        for pattern in &self.inner.patterns {
            self.inner.registrar.register(self.inner.parent_dir(pattern));
        }
    }

    /// Produce the entry mapping, scanning every pattern on the blocking
    /// pool concurrently.
    pub async fn resolve(&self) -> Result<EntryMap> {
        self.register_parents();

        let handles: Vec<_> = (0..self.inner.patterns.len())
            .map(|index| {
                let inner = Arc::clone(&self.inner);
                tokio::task::spawn_blocking(move || inner.resolve_pattern(&inner.patterns[index]))
            })
            .collect();

        let mut partials = Vec::with_capacity(handles.len());
        for handle in handles {
            let partial = match handle.await {
                Ok(result) => result?,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => return Err(anyhow!("pattern scan task failed: {e}").into()),
            };
            partials.push(partial);
        }

        Ok(self.inner.merge(partials))
    }

    /// Produce the entry mapping on the calling thread, one pattern after
    /// another.
    pub fn resolve_blocking(&self) -> Result<EntryMap> {
        self.register_parents();

        let partials = self
            .inner
            .patterns
            .iter()
            .map(|pattern| self.inner.resolve_pattern(pattern))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.inner.merge(partials))
    }

    /// Zero-argument callable producing a fresh mapping on every call.
    pub fn entries(&self) -> EntriesFn {
        EntriesFn {
            resolver: self.clone(),
        }
    }
}

impl Inner {
    fn parent_dir(&self, pattern: &GlobPattern) -> PathBuf {
        absolutize(&self.cwd, Path::new(pattern.parent()))
    }

    fn resolve_pattern(&self, pattern: &GlobPattern) -> Result<EntryMap> {
        let parent = self.parent_dir(pattern);
        let files = self
            .engine
            .glob(pattern, &self.cwd, &self.options.glob)
            .map_err(|e| GlobEntriesError::glob_match(pattern.as_str(), e))?;

        debug!(pattern = pattern.as_str(), matched = files.len(), "scanned pattern");

        let mut entries = EntryMap::new();
        for (index, file) in files.into_iter().enumerate() {
            let file = absolutize(&self.cwd, &file);

            if let Some(filter) = &self.options.filter {
                if !filter(&file, index) {
                    trace!(?file, "filtered out");
                    continue;
                }
            }

            let name = entry_name(&file, &parent, &self.options)?;
            let value = entry_value(&file, &parent, &self.options)?;
            entries.insert(name, value);
        }

        Ok(entries)
    }

    /// Seed first, then each pattern's entries in pattern order; later
    /// entries overwrite earlier ones with the same name.
    fn merge(&self, partials: Vec<EntryMap>) -> EntryMap {
        let mut merged = self.options.seed.clone();
        for partial in partials {
            merged.extend(partial);
        }
        info!(entries = merged.len(), "resolved entries");
        merged
    }
}

/// Boxed future returned by [`EntriesFn::call`].
pub type EntriesFuture = Pin<Box<dyn Future<Output = Result<EntryMap>> + Send + 'static>>;

/// Callable handed to the build tool as its dynamic entry.
#[derive(Clone, Debug)]
pub struct EntriesFn {
    resolver: Resolver,
}

impl EntriesFn {
    pub fn call(&self) -> EntriesFuture {
        let resolver = self.resolver.clone();
        Box::pin(async move { resolver.resolve().await })
    }

    pub fn call_blocking(&self) -> Result<EntryMap> {
        self.resolver.resolve_blocking()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

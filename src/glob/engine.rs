// src/glob/engine.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::errors::GlobEntriesError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::glob::parent::{split_parent, strip_dot_slash};
use crate::glob::path_utils::{is_hidden, unixify};

/// Options forwarded to the glob engine.
///
/// These are not interpreted by the entry resolver; they only change which
/// files the engine reports.
///
/// ```toml
/// [glob]
/// cwd = "."
/// dot = false
/// case_insensitive = false
/// follow = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobOptions {
    /// Base directory for relative patterns. Defaults to the process working
    /// directory.
    pub cwd: Option<PathBuf>,

    /// Let wildcards match path segments that start with a dot.
    pub dot: bool,

    /// Match case-insensitively.
    pub case_insensitive: bool,

    /// Descend into symlinked directories while walking.
    pub follow: bool,

    /// Also report directories whose path matches the pattern.
    pub match_directories: bool,
}

impl GlobOptions {
    /// Absolute base directory: `cwd` joined onto the process working
    /// directory, or the process working directory itself.
    pub fn effective_cwd(&self) -> crate::errors::Result<PathBuf> {
        let process_cwd = std::env::current_dir()?;
        Ok(match &self.cwd {
            Some(cwd) => super::path_utils::absolutize(&process_cwd, cwd),
            None => process_cwd,
        })
    }
}

/// A compiled glob pattern plus what the walker needs to know about it.
#[derive(Clone)]
pub struct GlobPattern {
    source: String,
    normalized: String,
    parent: String,
    matcher: GlobMatcher,
    /// Number of segments below `parent` a match can sit at; `None` when the
    /// pattern contains `**`.
    max_depth: Option<usize>,
    /// Index (below `parent`) of the first `**` segment.
    globstar_at: Option<usize>,
    /// Per segment below `parent`, up to the first `**`: whether it names
    /// dotfiles explicitly.
    dot_segments: Vec<bool>,
    /// Segments after the first `**` that start with a literal `.`; a hidden
    /// name at any depth there is admitted when one of them matches it.
    dot_after_globstar: Vec<GlobMatcher>,
}

impl fmt::Debug for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobPattern")
            .field("source", &self.source)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl GlobPattern {
    /// Compile `pattern`. Fails with `InvalidArgument` on empty or malformed
    /// globs.
    pub fn new(pattern: &str, options: &GlobOptions) -> crate::errors::Result<Self> {
        if pattern.is_empty() {
            return Err(GlobEntriesError::invalid_argument(
                "glob patterns must be non-empty strings",
            ));
        }

        let normalized = strip_dot_slash(pattern).to_string();
        let matcher = GlobBuilder::new(&normalized)
            .literal_separator(true)
            .case_insensitive(options.case_insensitive)
            .build()
            .map_err(|e| {
                GlobEntriesError::invalid_argument(format!("invalid glob pattern `{pattern}`: {e}"))
            })?
            .compile_matcher();

        let (parent, consumed) = split_parent(&normalized);
        let below: Vec<&str> = normalized.split('/').skip(consumed).collect();
        let globstar_at = below.iter().position(|s| s.contains("**"));
        let max_depth = match globstar_at {
            Some(_) => None,
            None => Some(below.len()),
        };
        let names_dotfiles = |s: &&str| s.starts_with('.') && *s != "." && *s != "..";
        let dot_segments = below
            .iter()
            .take(globstar_at.unwrap_or(below.len()))
            .map(|s| names_dotfiles(s))
            .collect();
        let dot_after_globstar = match globstar_at {
            Some(at) => below
                .iter()
                .skip(at + 1)
                .filter(|s| names_dotfiles(s))
                .filter_map(|s| {
                    GlobBuilder::new(s)
                        .case_insensitive(options.case_insensitive)
                        .build()
                        .ok()
                })
                .map(|g| g.compile_matcher())
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            source: pattern.to_string(),
            normalized,
            parent,
            matcher,
            max_depth,
            globstar_at,
            dot_segments,
            dot_after_globstar,
        })
    }

    /// The pattern as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Literal directory prefix, relative to `cwd` unless the pattern is
    /// absolute.
    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn is_absolute(&self) -> bool {
        self.normalized.starts_with('/') || Path::new(&self.normalized).is_absolute()
    }

    /// Directory the walker starts from. Not normalised, so that every walked
    /// path keeps `cwd` as a lexical prefix.
    pub fn walk_root(&self, cwd: &Path) -> PathBuf {
        if self.parent == "." {
            cwd.to_path_buf()
        } else {
            cwd.join(&self.parent)
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Match a candidate path (forward slashes, relative to `cwd` for relative
    /// patterns, absolute for absolute ones).
    pub fn is_match(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }

    fn candidate(&self, cwd: &Path, path: &Path) -> String {
        if self.is_absolute() {
            return unixify(&path.to_string_lossy());
        }
        match path.strip_prefix(cwd) {
            Ok(rel) => unixify(&rel.to_string_lossy()),
            Err(_) => unixify(&path.to_string_lossy()),
        }
    }

    /// Whether a hidden name found `depth` levels below the walk root may be
    /// matched or descended into.
    fn admits_hidden(&self, path: &Path, depth: usize, options: &GlobOptions) -> bool {
        if options.dot {
            return true;
        }
        match self.dot_segments.get(depth - 1) {
            Some(&explicit) => explicit,
            None => path
                .file_name()
                .is_some_and(|name| self.dot_after_globstar.iter().any(|m| m.is_match(name))),
        }
    }

    /// Symlinked directories are left alone while recursing for `**` unless
    /// `follow` is set. Literal and single-level wildcard segments always
    /// resolve through them.
    fn enters_symlink_at(&self, depth: usize, options: &GlobOptions) -> bool {
        options.follow || self.globstar_at.is_none_or(|at| depth <= at)
    }
}

/// The glob-matching capability: given a pattern and options, list matching
/// paths in a stable order.
pub trait GlobEngine: Send + Sync + fmt::Debug {
    fn glob(&self, pattern: &GlobPattern, cwd: &Path, options: &GlobOptions)
        -> Result<Vec<PathBuf>>;
}

/// Glob engine that walks a [`FileSystem`] from the pattern's parent directory
/// and tests every path with `globset`.
#[derive(Debug, Clone)]
pub struct FsGlobEngine {
    fs: Arc<dyn FileSystem>,
}

impl Default for FsGlobEngine {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl FsGlobEngine {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl GlobEngine for FsGlobEngine {
    /// Returned paths are sorted lexicographically. A missing parent
    /// directory yields no matches; an unreadable one is an error.
    fn glob(
        &self,
        pattern: &GlobPattern,
        cwd: &Path,
        options: &GlobOptions,
    ) -> Result<Vec<PathBuf>> {
        let root = pattern.walk_root(cwd);
        if !self.fs.is_dir(&root) {
            debug!(pattern = pattern.as_str(), ?root, "parent directory missing; no matches");
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        let mut stack = vec![(root, 0usize)];

        while let Some((dir, depth)) = stack.pop() {
            let children = self
                .fs
                .read_dir(&dir)
                .with_context(|| format!("scanning {:?}", dir))?;

            for path in children {
                let child_depth = depth + 1;
                let hidden = is_hidden(&path);

                if self.fs.is_dir(&path) {
                    if hidden && !pattern.admits_hidden(&path, child_depth, options) {
                        continue;
                    }
                    if options.match_directories
                        && pattern.is_match(&pattern.candidate(cwd, &path))
                    {
                        matches.push(path.clone());
                    }
                    let within_depth = pattern.max_depth().is_none_or(|max| child_depth < max);
                    let enters = !self.fs.is_symlink(&path)
                        || pattern.enters_symlink_at(child_depth, options);
                    if within_depth && enters {
                        stack.push((path, child_depth));
                    }
                } else if self.fs.is_file(&path) {
                    if hidden && !pattern.admits_hidden(&path, child_depth, options) {
                        continue;
                    }
                    let candidate = pattern.candidate(cwd, &path);
                    if pattern.is_match(&candidate) {
                        trace!(%candidate, "matched");
                        matches.push(path);
                    }
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn engine(fs: &MockFileSystem) -> FsGlobEngine {
        FsGlobEngine::new(Arc::new(fs.clone()))
    }

    fn glob(fs: &MockFileSystem, pattern: &str, options: &GlobOptions) -> Vec<String> {
        let pattern = GlobPattern::new(pattern, options).unwrap();
        engine(fs)
            .glob(&pattern, Path::new("/project"), options)
            .unwrap()
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    fn fixture() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_file("/project/src/pages/home/index.js");
        fs.add_file("/project/src/pages/about/index.js");
        fs.add_file("/project/src/pages/about/style.css");
        fs.add_file("/project/src/main.js");
        fs.add_file("/project/src/.hidden.js");
        fs.add_file("/project/README.md");
        fs
    }

    #[test]
    fn single_star_stays_in_one_directory() {
        let fs = fixture();
        let opts = GlobOptions::default();
        assert_eq!(glob(&fs, "src/*.js", &opts), vec!["/project/src/main.js"]);
    }

    #[test]
    fn double_star_recurses_and_sorts() {
        let fs = fixture();
        let opts = GlobOptions::default();
        assert_eq!(
            glob(&fs, "./src/**/*.js", &opts),
            vec![
                "/project/src/main.js",
                "/project/src/pages/about/index.js",
                "/project/src/pages/home/index.js",
            ]
        );
    }

    #[test]
    fn dot_option_admits_hidden_files() {
        let fs = fixture();
        let opts = GlobOptions {
            dot: true,
            ..GlobOptions::default()
        };
        assert_eq!(
            glob(&fs, "src/*.js", &opts),
            vec!["/project/src/.hidden.js", "/project/src/main.js"]
        );
        assert_eq!(
            glob(&fs, "src/.*.js", &GlobOptions::default()),
            vec!["/project/src/.hidden.js"]
        );
    }

    #[test]
    fn case_insensitive_matching() {
        let fs = fixture();
        let opts = GlobOptions {
            case_insensitive: true,
            ..GlobOptions::default()
        };
        assert_eq!(glob(&fs, "readme.MD", &opts), vec!["/project/README.md"]);
        assert!(glob(&fs, "readme.MD", &GlobOptions::default()).is_empty());
    }

    #[test]
    fn missing_parent_yields_nothing() {
        let fs = fixture();
        assert!(glob(&fs, "nope/**/*.js", &GlobOptions::default()).is_empty());
    }

    #[test]
    fn symlinked_dirs_are_only_walked_with_follow() {
        let fs = fixture();
        fs.add_file("/project/src/linked/x.js");
        fs.mark_symlink("/project/src/linked");

        assert!(!glob(&fs, "src/**/x.js", &GlobOptions::default()).contains(&"/project/src/linked/x.js".to_string()));
        let follow = GlobOptions {
            follow: true,
            ..GlobOptions::default()
        };
        assert_eq!(glob(&fs, "src/**/x.js", &follow), vec!["/project/src/linked/x.js"]);
    }

    #[test]
    fn symlinked_dirs_resolve_for_bounded_segments() {
        let fs = fixture();
        fs.add_file("/project/src/pages/linked/index.js");
        fs.mark_symlink("/project/src/pages/linked");
        fs.add_file("/project/src/shared/util.js");
        fs.mark_symlink("/project/src/shared");
        let opts = GlobOptions::default();

        assert_eq!(
            glob(&fs, "src/pages/*/index.js", &opts),
            vec![
                "/project/src/pages/about/index.js",
                "/project/src/pages/home/index.js",
                "/project/src/pages/linked/index.js",
            ]
        );
        assert_eq!(glob(&fs, "src/shared/util.js", &opts), vec!["/project/src/shared/util.js"]);
        // `*` before `**` still goes through the link; `**` itself does not.
        assert_eq!(glob(&fs, "src/*/**/util.js", &opts), vec!["/project/src/shared/util.js"]);
        assert!(glob(&fs, "src/**/util.js", &opts).is_empty());
    }

    #[test]
    fn dot_segment_only_admits_hidden_names_at_its_depth() {
        let fs = fixture();
        fs.add_file("/project/src/.config/app.js");
        fs.add_file("/project/src/.config/.secret.js");
        fs.add_file("/project/src/pages/.eslintrc");
        let opts = GlobOptions::default();

        assert_eq!(glob(&fs, "src/.config/*.js", &opts), vec!["/project/src/.config/app.js"]);
        assert_eq!(glob(&fs, "src/**/.eslintrc", &opts), vec!["/project/src/pages/.eslintrc"]);
        assert_eq!(
            glob(&fs, "src/**/.config/*.js", &opts),
            vec!["/project/src/.config/app.js"]
        );
        assert!(!glob(&fs, "src/**/*.js", &opts).contains(&"/project/src/.config/app.js".to_string()));
    }

    #[test]
    fn directories_only_when_requested() {
        let fs = fixture();
        assert!(glob(&fs, "src/pages/*", &GlobOptions::default()).is_empty());
        let opts = GlobOptions {
            match_directories: true,
            ..GlobOptions::default()
        };
        assert_eq!(
            glob(&fs, "src/pages/*", &opts),
            vec!["/project/src/pages/about", "/project/src/pages/home"]
        );
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let fs = fixture();
        fs.mark_unreadable("/project/src/pages");
        let opts = GlobOptions::default();
        let pattern = GlobPattern::new("src/**/*.js", &opts).unwrap();

        let err = engine(&fs)
            .glob(&pattern, Path::new("/project"), &opts)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Permission denied"));
    }

    #[test]
    fn absolute_patterns_match_absolute_paths() {
        let fs = fixture();
        assert_eq!(
            glob(&fs, "/project/src/pages/*/index.js", &GlobOptions::default()),
            vec!["/project/src/pages/about/index.js", "/project/src/pages/home/index.js"]
        );
    }

    #[test]
    fn invalid_and_empty_patterns_are_rejected() {
        let opts = GlobOptions::default();
        assert!(GlobPattern::new("src/[", &opts).unwrap_err().is_invalid_argument());
        assert!(GlobPattern::new("", &opts).unwrap_err().is_invalid_argument());
    }
}

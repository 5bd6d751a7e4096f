#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob_entries::fs::mock::MockFileSystem;
use glob_entries::glob::{FsGlobEngine, GlobOptions};
use glob_entries::ResolverOptions;
use tempfile::TempDir;

/// Directory tree on the real filesystem, removed on drop.
pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("creating temp dir"),
        }
    }

    /// Canonical root, so paths compare equal to what the resolver reports
    /// on platforms where the temp dir sits behind a symlink.
    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("canonicalizing temp dir")
    }

    /// Create `rel` (and its parent directories) with placeholder content.
    pub fn file(self, rel: &str) -> Self {
        self.touch(rel);
        self
    }

    pub fn touch(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating fixture dirs");
        }
        fs::write(&path, b"// fixture\n").expect("writing fixture file");
        path
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.root().join(rel)).expect("creating fixture dir");
        self
    }

    /// Create a symlink at `link` pointing to the existing `target`.
    #[cfg(unix)]
    pub fn symlink(self, target: &str, link: &str) -> Self {
        std::os::unix::fs::symlink(self.root().join(target), self.root().join(link))
            .expect("creating fixture symlink");
        self
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root().join(rel)).expect("removing fixture file");
    }

    pub fn abs(&self, rel: &str) -> String {
        self.root().join(rel).to_string_lossy().into_owned()
    }

    /// Resolver options rooted at this tree.
    pub fn options(&self) -> ResolverOptions {
        ResolverOptions::new().with_glob(GlobOptions {
            cwd: Some(self.root()),
            ..GlobOptions::default()
        })
    }
}

impl Default for FixtureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an in-memory project rooted at `/project`.
pub struct MockProjectBuilder {
    fs: MockFileSystem,
    root: PathBuf,
}

impl MockProjectBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            root: PathBuf::from("/project"),
        }
    }

    pub fn file(self, rel: &str) -> Self {
        self.fs.add_file(self.root.join(rel));
        self
    }

    pub fn unreadable_dir(self, rel: &str) -> Self {
        let path = self.root.join(rel);
        self.fs.add_dir(&path);
        self.fs.mark_unreadable(&path);
        self
    }

    pub fn build(self) -> MockProject {
        MockProject {
            fs: self.fs,
            root: self.root,
        }
    }
}

impl Default for MockProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory project plus resolver options wired to it.
pub struct MockProject {
    pub fs: MockFileSystem,
    pub root: PathBuf,
}

impl MockProject {
    pub fn abs(&self, rel: &str) -> String {
        self.root.join(rel).to_string_lossy().into_owned()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn options(&self) -> ResolverOptions {
        ResolverOptions::new()
            .with_glob(GlobOptions {
                cwd: Some(self.root.clone()),
                ..GlobOptions::default()
            })
            .with_engine(Arc::new(FsGlobEngine::new(Arc::new(self.fs.clone()))))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

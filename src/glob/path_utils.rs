// src/glob/path_utils.rs

//! Utility functions for path handling in the glob engine and entry naming.

use std::path::{Component, Path, PathBuf};

/// Convert path separators to forward slashes.
pub fn unixify(s: &str) -> String {
    s.replace('\\', "/")
}

/// Lexically normalise `path`: drop `.` components and fold `..` into the
/// preceding normal component. Does not touch the filesystem, so symlinks are
/// not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Make `path` absolute against `base`, then normalise it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// First we try a direct `strip_prefix(root)`. If that fails (e.g. due to
/// symlinks or different absolute prefixes), we canonicalize both paths and
/// try again.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(unixify(&rel.to_string_lossy()));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(unixify(&rel.to_string_lossy()));
        }
    }

    None
}

/// Strip the extension of the last segment of a `/`-separated path.
///
/// The extension starts at the last `.` of the final segment, unless that
/// dot is the segment's first character (`.babelrc` has no extension).
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

/// True if the final component of `path` starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

// src/glob/parent.rs

//! Parent-directory derivation for glob patterns.
//!
//! The parent of a pattern is its longest literal directory prefix:
//!
//! | pattern           | parent   |
//! |-------------------|----------|
//! | `src/**/*.js`     | `src`    |
//! | `*.js`            | `.`      |
//! | `src/a.js`        | `src`    |
//! | `src/`            | `src`    |
//! | `/abs/x/*.js`     | `/abs/x` |
//! | `src/{a,b}/*.js`  | `src`    |
//! | `src/@(app)/*.js` | `src`    |
//!
//! The parent is both the directory the glob engine starts walking from and
//! the directory handed to the build tool as a context dependency.

/// Characters that make a path segment a glob rather than a literal name.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '(', ')', '\\'];

/// Strip any number of leading `./` segments.
pub fn strip_dot_slash(pattern: &str) -> &str {
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest
}

/// True if `segment` contains glob syntax (or a leading `!` negation).
pub fn has_glob_meta(segment: &str) -> bool {
    segment.starts_with('!') || segment.contains(GLOB_META)
}

/// Longest literal directory prefix of `pattern`.
pub fn glob_parent(pattern: &str) -> String {
    split_parent(pattern).0
}

/// Returns the parent together with the number of `/`-separated segments of
/// the (dot-slash stripped) pattern it consumed.
pub(crate) fn split_parent(pattern: &str) -> (String, usize) {
    let pattern = strip_dot_slash(pattern);
    let is_absolute = pattern.starts_with('/');

    let mut segments: Vec<&str> = pattern.split('/').collect();
    // The final segment names the matched entry, never the parent. For a
    // trailing slash it is empty and the directory itself is the parent.
    segments.pop();
    if let Some(first_glob) = segments.iter().position(|s| has_glob_meta(s)) {
        segments.truncate(first_glob);
    }

    let consumed = segments.len();
    let joined = segments.join("/");
    let parent = if joined.is_empty() {
        if is_absolute { "/".to_string() } else { ".".to_string() }
    } else {
        joined
    };

    (parent, consumed)
}

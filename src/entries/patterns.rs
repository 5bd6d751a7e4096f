// src/entries/patterns.rs

use crate::errors::{GlobEntriesError, Result};

/// One glob pattern or an ordered list of them, as given to
/// [`Resolver::new`](super::Resolver::new).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patterns(Vec<String>);

impl Patterns {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Patterns {
    fn from(pattern: &str) -> Self {
        Patterns(vec![pattern.to_string()])
    }
}

impl From<String> for Patterns {
    fn from(pattern: String) -> Self {
        Patterns(vec![pattern])
    }
}

impl From<Vec<String>> for Patterns {
    fn from(patterns: Vec<String>) -> Self {
        Patterns(patterns)
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(patterns: Vec<&str>) -> Self {
        Patterns(patterns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Patterns {
    fn from(patterns: &[&str]) -> Self {
        Patterns(patterns.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Patterns {
    fn from(patterns: [&str; N]) -> Self {
        Patterns(patterns.iter().map(|p| p.to_string()).collect())
    }
}

/// Untyped input (e.g. the `patterns` key of a config file) must be a string
/// or an array of strings.
impl TryFrom<toml::Value> for Patterns {
    type Error = GlobEntriesError;

    fn try_from(value: toml::Value) -> Result<Self> {
        match value {
            toml::Value::String(pattern) => Ok(Patterns(vec![pattern])),
            toml::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(pattern) => Ok(pattern),
                    other => Err(not_a_pattern(&other)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Patterns),
            other => Err(not_a_pattern(&other)),
        }
    }
}

fn not_a_pattern(value: &toml::Value) -> GlobEntriesError {
    GlobEntriesError::invalid_argument(format!(
        "patterns must be a glob string or an array of glob strings (got {} `{}`)",
        value.type_str(),
        value
    ))
}

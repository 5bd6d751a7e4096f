// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobEntriesError {
    /// Malformed input: bad `patterns`, an uncompilable glob, or a
    /// `map_entry_name` / `map_entry` callback returning an empty value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The glob engine could not scan the filesystem for `pattern`.
    #[error("Glob match failed for pattern `{pattern}`: {source:#}")]
    GlobMatchFailure {
        pattern: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlobEntriesError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        GlobEntriesError::InvalidArgument(msg.into())
    }

    pub(crate) fn glob_match(pattern: impl Into<String>, source: anyhow::Error) -> Self {
        GlobEntriesError::GlobMatchFailure {
            pattern: pattern.into(),
            source,
        }
    }

    /// True for `InvalidArgument`.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GlobEntriesError::InvalidArgument(_))
    }

    /// True for `GlobMatchFailure`.
    pub fn is_glob_match_failure(&self) -> bool {
        matches!(self, GlobEntriesError::GlobMatchFailure { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GlobEntriesError>;

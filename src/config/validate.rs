// src/config/validate.rs

use crate::config::model::{build_exclude_set, ConfigFile, RawConfigFile};
use crate::entries::Patterns;
use crate::errors::{GlobEntriesError, Result};
use crate::glob::GlobPattern;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GlobEntriesError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let patterns = validate_patterns(&raw)?;
        validate_exclude(&raw)?;
        Ok(ConfigFile::new_unchecked(patterns, raw.exclude, raw.glob, raw.seed))
    }
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<Patterns> {
    let Some(value) = cfg.patterns.clone() else {
        return Err(GlobEntriesError::invalid_argument(
            "no patterns given (pass them on the command line or set `patterns` in the config)",
        ));
    };

    let patterns = Patterns::try_from(value)?;
    if patterns.is_empty() {
        return Err(GlobEntriesError::invalid_argument(
            "`patterns` must contain at least one glob",
        ));
    }

    // Compile once here so a bad glob is reported against the config rather
    // than at first resolution.
    for pattern in patterns.as_slice() {
        GlobPattern::new(pattern, &cfg.glob)?;
    }

    Ok(patterns)
}

fn validate_exclude(cfg: &RawConfigFile) -> Result<()> {
    if cfg.exclude.iter().any(String::is_empty) {
        return Err(GlobEntriesError::invalid_argument(
            "`exclude` entries must be non-empty globs",
        ));
    }
    build_exclude_set(&cfg.exclude)?;
    Ok(())
}

/// Validate an already-parsed raw config.
pub fn validate_config(raw: RawConfigFile) -> Result<ConfigFile> {
    ConfigFile::try_from(raw)
}

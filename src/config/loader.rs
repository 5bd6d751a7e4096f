// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization plus one adjustment: a relative
/// (or missing) `[glob].cwd` is taken relative to the directory holding the
/// config file. It does **not** validate patterns. Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;

    let root = config_root_dir(path);
    config.glob.cwd = Some(match config.glob.cwd.take() {
        Some(cwd) if cwd.is_absolute() => cwd,
        Some(cwd) => root.join(cwd),
        None => root,
    });

    debug!(?path, cwd = ?config.glob.cwd, "loaded config file");
    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Command-line values layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces the file's `patterns` when non-empty.
    pub patterns: Vec<String>,
    /// Appended to the file's `exclude`.
    pub exclude: Vec<String>,
    /// Replaces `[glob].cwd`; relative to the process working directory.
    pub cwd: Option<PathBuf>,
    pub dot: bool,
    pub case_insensitive: bool,
    pub follow: bool,
}

impl ConfigOverrides {
    pub fn apply(self, raw: &mut RawConfigFile) {
        if !self.patterns.is_empty() {
            raw.patterns = Some(toml::Value::Array(
                self.patterns.into_iter().map(toml::Value::String).collect(),
            ));
        }
        raw.exclude.extend(self.exclude);
        if let Some(cwd) = self.cwd {
            raw.glob.cwd = Some(cwd);
        }
        // Flags can only switch options on.
        raw.glob.dot |= self.dot;
        raw.glob.case_insensitive |= self.case_insensitive;
        raw.glob.follow |= self.follow;
    }
}

/// Load the config (if any), apply `overrides`, validate.
///
/// - An explicit `path` must exist.
/// - Without one, [`default_config_path`] is used if present; otherwise the
///   configuration comes from `overrides` alone.
pub fn load_with_overrides(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ConfigFile> {
    let mut raw = match path {
        Some(path) => load_from_path(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                load_from_path(&default_path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    overrides.apply(&mut raw);
    ConfigFile::try_from(raw)
}

/// Helper to resolve a default config path: `GlobEntries.toml` in the current
/// working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("GlobEntries.toml")
}

/// Directory patterns in a config file are relative to.
///
/// - If the config path has a non-empty parent (e.g. "web/GlobEntries.toml"),
///   we use that directory.
/// - If it's just a bare filename like "GlobEntries.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_patterns_and_extend_exclude() {
        let mut raw = RawConfigFile {
            patterns: Some(toml::Value::String("old/*.js".into())),
            exclude: vec!["a".into()],
            ..RawConfigFile::default()
        };
        ConfigOverrides {
            patterns: vec!["new/*.js".into()],
            exclude: vec!["b".into()],
            dot: true,
            ..ConfigOverrides::default()
        }
        .apply(&mut raw);

        assert_eq!(
            raw.patterns,
            Some(toml::Value::Array(vec![toml::Value::String("new/*.js".into())]))
        );
        assert_eq!(raw.exclude, vec!["a".to_string(), "b".to_string()]);
        assert!(raw.glob.dot);
    }

    #[test]
    fn empty_override_keeps_file_patterns() {
        let mut raw = RawConfigFile {
            patterns: Some(toml::Value::String("keep/*.js".into())),
            ..RawConfigFile::default()
        };
        ConfigOverrides::default().apply(&mut raw);
        assert_eq!(raw.patterns, Some(toml::Value::String("keep/*.js".into())));
    }

    #[test]
    fn bare_file_name_roots_at_process_cwd() {
        assert_eq!(
            config_root_dir(Path::new("GlobEntries.toml")),
            std::env::current_dir().unwrap()
        );
        assert_eq!(config_root_dir(Path::new("web/x.toml")), PathBuf::from("web"));
    }
}

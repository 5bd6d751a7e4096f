// src/entries/naming.rs

//! Entry name and value derivation for a single resolved file.

use std::path::Path;

use crate::entries::options::{EntryValue, ResolverOptions};
use crate::errors::{GlobEntriesError, Result};
use crate::glob::path_utils::{relative_str, strip_extension, unixify};

/// Default entry name: `file` relative to `parent`, extension stripped,
/// forward slashes.
///
/// `src/pages/home/index.js` under `src/pages` → `home/index`.
pub fn default_entry_name(file: &Path, parent: &Path) -> String {
    let relative =
        relative_str(parent, file).unwrap_or_else(|| unixify(&file.to_string_lossy()));
    strip_extension(&relative).to_string()
}

/// Entry name for `file`, using `map_entry_name` when configured.
pub fn entry_name(file: &Path, parent: &Path, options: &ResolverOptions) -> Result<String> {
    let Some(map_entry_name) = &options.map_entry_name else {
        return Ok(default_entry_name(file, parent));
    };

    let name = map_entry_name(file, parent);
    if name.is_empty() {
        return Err(GlobEntriesError::invalid_argument(format!(
            "map_entry_name must return a non-empty string (file {:?})",
            file
        )));
    }
    Ok(unixify(&name))
}

/// Entry value for `file`: its absolute path, or the validated result of
/// `map_entry`.
pub fn entry_value(file: &Path, parent: &Path, options: &ResolverOptions) -> Result<EntryValue> {
    let Some(map_entry) = &options.map_entry else {
        return Ok(EntryValue::from(file));
    };

    let value = map_entry(file, parent);
    value.validate().map_err(|_| {
        GlobEntriesError::invalid_argument(format!(
            "map_entry must return a non-empty string or a list of non-empty strings (file {:?})",
            file
        ))
    })?;
    Ok(value)
}

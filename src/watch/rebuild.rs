// src/watch/rebuild.rs

use std::path::PathBuf;

use tracing::debug;

use crate::entries::{EntriesFn, EntryMap};
use crate::errors::Result;
use crate::plugin::Compiler;

/// Outcome of one successful watch-mode rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebuild {
    /// The mapping differs from the previous one (which has been replaced).
    pub changed: bool,
    /// Context dependencies handed over by this compilation.
    pub directories: Vec<PathBuf>,
}

/// Recompile and compare the result against `last`.
///
/// On error `last` is left as it was, so the next successful rebuild is
/// compared with the last mapping that was reported.
pub async fn rebuild(
    compiler: &mut Compiler,
    entries: &EntriesFn,
    last: &mut EntryMap,
) -> Result<Rebuild> {
    let compilation = compiler.compile(entries).await?;
    let directories = compilation.context_dependencies.directories();

    let changed = compilation.entries != *last;
    if changed {
        *last = compilation.entries;
    } else {
        debug!("entries unchanged");
    }

    Ok(Rebuild {
        changed,
        directories,
    })
}

// src/lib.rs

pub mod cli;
pub mod config;
pub mod entries;
pub mod errors;
pub mod fs;
pub mod glob;
pub mod logging;
pub mod plugin;
pub mod watch;

pub use entries::{EntriesFn, EntryMap, EntryValue, Patterns, Resolver, ResolverOptions};
pub use errors::{GlobEntriesError, Result};
pub use glob::GlobOptions;
pub use plugin::GlobEntriesPlugin;
pub use watch::WatchRegistrar;

use std::io::Write;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_with_overrides, ConfigFile};
use crate::plugin::{Compiler, HookStyle};
use crate::watch::{rebuild, spawn_watcher, StructuralChange, WatcherHandle};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the resolver and its build-host plugin
/// - one compilation, printed as JSON
/// - (optional) a directory watcher that recompiles on structural changes;
///   a failed rebuild is logged and the watcher keeps running
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_with_overrides(args.config.as_deref(), args.overrides())?;
    let resolver = Resolver::new(cfg.patterns.clone(), cfg.resolver_options()?)?;

    if args.dry_run {
        print_dry_run(&cfg, &resolver);
        return Ok(());
    }

    let mut compiler = Compiler::new(HookStyle::Tapable);
    GlobEntriesPlugin::new(&resolver).install(&mut compiler);
    let entries = resolver.entries();

    let compilation = compiler.compile(&entries).await?;
    print_entries(&compilation.entries)?;

    if !args.watch {
        return Ok(());
    }

    let (changes_tx, mut changes_rx) = mpsc::channel::<StructuralChange>(64);
    let mut watcher = spawn_watcher(changes_tx)?;
    watcher.watch_dirs(compilation.context_dependencies.directories())?;

    let mut last = compilation.entries;
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                }
                info!("shutting down");
                break;
            }
            change = changes_rx.recv() => {
                let Some(change) = change else { break };
                // Coalesce a burst of events into one rebuild.
                let mut paths = change.paths;
                while let Ok(more) = changes_rx.try_recv() {
                    paths.extend(more.paths);
                }
                debug!(?paths, "rebuilding after structural change");

                match rebuild(&mut compiler, &entries, &mut last).await {
                    Ok(outcome) => {
                        keep_watching(&mut watcher, outcome.directories);
                        if outcome.changed {
                            print_entries(&last)?;
                        }
                    }
                    Err(err) => {
                        warn!("rebuild failed, waiting for the next change: {err}");
                        keep_watching(&mut watcher, resolver.parent_directories());
                    }
                }
            }
        }
    }

    Ok(())
}

fn keep_watching(watcher: &mut WatcherHandle, dirs: Vec<std::path::PathBuf>) {
    if let Err(err) = watcher.watch_dirs(dirs) {
        warn!("could not extend watched directories: {err}");
    }
}

fn print_entries(entries: &EntryMap) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).map_err(anyhow::Error::from)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

/// Simple dry-run output: patterns, their parents, and options.
fn print_dry_run(cfg: &ConfigFile, resolver: &Resolver) {
    println!("glob-entries dry-run");
    println!("  cwd = {}", resolver.cwd().display());
    println!("  dot = {}", cfg.glob.dot);
    println!("  case_insensitive = {}", cfg.glob.case_insensitive);
    println!("  follow = {}", cfg.glob.follow);
    println!();

    println!("patterns ({}):", resolver.patterns().len());
    for pattern in resolver.patterns() {
        println!("  - {}", pattern.as_str());
        println!("      parent: {}", pattern.parent());
    }
    if !cfg.exclude.is_empty() {
        println!("exclude: {:?}", cfg.exclude);
    }
    if !cfg.seed.is_empty() {
        println!("seed ({}):", cfg.seed.len());
        for name in cfg.seed.keys() {
            println!("  - {name}");
        }
    }

    debug!("dry-run complete (no scan)");
}

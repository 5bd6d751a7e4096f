// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::ConfigOverrides;

/// Command-line arguments for `glob-entries`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "glob-entries",
    version,
    about = "Resolve glob patterns into bundler entry points.",
    long_about = None
)]
pub struct CliArgs {
    /// Glob patterns. Override `patterns` from the config file.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `GlobEntries.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base directory for relative patterns.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Let wildcards match dotfiles.
    #[arg(long)]
    pub dot: bool,

    /// Match case-insensitively.
    #[arg(long)]
    pub case_insensitive: bool,

    /// Descend into symlinked directories.
    #[arg(long)]
    pub follow: bool,

    /// Leave out files matching this glob (repeatable).
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Keep running and print a new mapping whenever files are added to or
    /// removed from the pattern directories.
    #[arg(long)]
    pub watch: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GLOB_ENTRIES_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print patterns and their parent directories without scanning.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The config-relevant part of the arguments.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            patterns: self.patterns.clone(),
            exclude: self.exclude.clone(),
            cwd: self.cwd.clone(),
            dot: self.dot,
            case_insensitive: self.case_insensitive,
            follow: self.follow,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

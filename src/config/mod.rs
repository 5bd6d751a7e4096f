// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI overrides (`loader.rs`).
//! - Validate patterns and exclusions (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_with_overrides, ConfigOverrides,
};
pub use model::{ConfigFile, RawConfigFile};
pub use validate::validate_config;

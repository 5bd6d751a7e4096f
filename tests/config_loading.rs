// tests/config_loading.rs

mod common;
use crate::common::builders::FixtureTree;
use crate::common::{init_tracing, TestResult};

use std::io::Write;

use glob_entries::config::{load_and_validate, load_with_overrides, ConfigOverrides};
use glob_entries::{EntryValue, GlobEntriesError, Resolver};
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn single_string_pattern() -> TestResult {
    init_tracing();
    let file = config_file(r#"patterns = "src/**/*.js""#);

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.patterns.as_slice(), ["src/**/*.js"]);
    Ok(())
}

#[test]
fn integer_patterns_are_invalid_argument() {
    init_tracing();
    let file = config_file("patterns = 42");

    match load_and_validate(file.path()) {
        Err(GlobEntriesError::InvalidArgument(msg)) => assert!(msg.contains("42")),
        Err(e) => panic!("Expected InvalidArgument, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_patterns_are_invalid_argument() {
    init_tracing();
    let file = config_file("exclude = [\"**/*.test.js\"]");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(err.is_invalid_argument(), "got {err:?}");
}

#[test]
fn unknown_keys_are_toml_errors() {
    init_tracing();
    let file = config_file("patterns = \"a/*.js\"\nglobs = \"b/*.js\"");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, GlobEntriesError::TomlError(_)), "got {err:?}");
}

#[test]
fn relative_cwd_is_taken_from_config_directory() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new().file("web/src/main.js");
    let config_path = tree.root().join("GlobEntries.toml");
    std::fs::write(
        &config_path,
        r#"
patterns = ["src/*.js"]

[glob]
cwd = "web"
"#,
    )?;

    let cfg = load_and_validate(&config_path)?;
    assert_eq!(cfg.glob.cwd, Some(tree.root().join("web")));

    let resolver = Resolver::new(cfg.patterns.clone(), cfg.resolver_options()?)?;
    let entries = resolver.resolve_blocking()?;
    assert_eq!(entries["main"], EntryValue::from(tree.abs("web/src/main.js")));
    Ok(())
}

#[test]
fn exclude_and_seed_flow_into_resolver() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new()
        .file("src/a.js")
        .file("src/a.test.js")
        .file("src/b.js");
    let config_path = tree.root().join("GlobEntries.toml");
    std::fs::write(
        &config_path,
        r#"
patterns = "src/*.js"
exclude = ["**/*.test.js"]

[seed]
vendor = "./vendor.js"
polyfills = ["./a.js", "./b.js"]
"#,
    )?;

    let cfg = load_and_validate(&config_path)?;
    let entries = Resolver::new(cfg.patterns.clone(), cfg.resolver_options()?)?.resolve_blocking()?;

    assert_eq!(
        entries.keys().collect::<Vec<_>>(),
        ["a", "b", "polyfills", "vendor"]
    );
    assert_eq!(
        entries["polyfills"],
        EntryValue::Many(vec!["./a.js".to_string(), "./b.js".to_string()])
    );
    Ok(())
}

#[test]
fn cli_overrides_replace_patterns_and_add_excludes() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new()
        .file("lib/x.js")
        .file("lib/x.spec.js")
        .file("src/y.js");
    let config_path = tree.root().join("GlobEntries.toml");
    std::fs::write(&config_path, "patterns = \"src/*.js\"\n")?;

    let overrides = ConfigOverrides {
        patterns: vec!["lib/*.js".to_string()],
        exclude: vec!["**/*.spec.js".to_string()],
        ..ConfigOverrides::default()
    };
    let cfg = load_with_overrides(Some(&config_path), overrides)?;
    let entries = Resolver::new(cfg.patterns.clone(), cfg.resolver_options()?)?.resolve_blocking()?;

    assert_eq!(entries.keys().collect::<Vec<_>>(), ["x"]);
    Ok(())
}

#[test]
fn invalid_exclude_glob_is_rejected() {
    init_tracing();
    let file = config_file("patterns = \"a/*.js\"\nexclude = [\"[\"]");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(err.is_invalid_argument(), "got {err:?}");
}

#[test]
fn explicit_missing_config_is_io_error() {
    init_tracing();
    let tree = FixtureTree::new();
    let missing = tree.root().join("nope.toml");

    let err = load_with_overrides(Some(&missing), ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, GlobEntriesError::IoError(_)), "got {err:?}");
}

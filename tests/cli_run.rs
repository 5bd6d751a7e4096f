// tests/cli_run.rs

mod common;
use crate::common::builders::FixtureTree;
use crate::common::{init_tracing, TestResult};

use clap::Parser;
use glob_entries::cli::CliArgs;
use glob_entries::run;

#[tokio::test]
async fn one_shot_run_succeeds() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new().file("src/a.js").file("src/b.js");
    let root = tree.root();

    let args = CliArgs::try_parse_from([
        "glob-entries",
        "--cwd",
        root.to_str().unwrap(),
        "src/*.js",
    ])?;

    run(args).await?;
    Ok(())
}

#[tokio::test]
async fn dry_run_does_not_need_existing_directories() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new();
    let root = tree.root();

    let args = CliArgs::try_parse_from([
        "glob-entries",
        "--dry-run",
        "--cwd",
        root.to_str().unwrap(),
        "nowhere/**/*.js",
    ])?;

    run(args).await?;
    Ok(())
}

#[tokio::test]
async fn run_without_patterns_is_invalid_argument() -> TestResult {
    init_tracing();
    let tree = FixtureTree::new();
    let config = tree.root().join("empty.toml");
    std::fs::write(&config, "exclude = []\n")?;

    let args = CliArgs::try_parse_from([
        "glob-entries",
        "--config",
        config.to_str().unwrap(),
    ])?;

    let err = run(args).await.unwrap_err();
    assert!(err.is_invalid_argument(), "got {err:?}");
    Ok(())
}

// tests/demo_config.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::path::PathBuf;

use glob_entries::config::load_and_validate;
use glob_entries::{EntryValue, Resolver};

#[test]
fn demo_web_config_resolves_pages_and_widgets() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let demo_dir = manifest_dir.join("demos/web");
    let cfg = load_and_validate(demo_dir.join("GlobEntries.toml"))?;

    let resolver = Resolver::new(cfg.patterns.clone(), cfg.resolver_options()?)?;
    let entries = resolver.resolve_blocking()?;

    assert_eq!(
        entries.keys().collect::<Vec<_>>(),
        ["about/index", "clock", "home/index", "vendor"]
    );
    assert_eq!(
        entries["clock"],
        EntryValue::from(demo_dir.join("src/widgets/clock.js").as_path())
    );
    assert_eq!(entries["vendor"], EntryValue::from("./vendor/index.js"));

    assert_eq!(
        resolver.registrar().snapshot(),
        vec![demo_dir.join("src/pages"), demo_dir.join("src/widgets")]
    );
    Ok(())
}

// tests/resolution_properties.rs

mod common;
use crate::common::builders::MockProjectBuilder;

use std::collections::BTreeSet;

use glob_entries::Resolver;
use proptest::prelude::*;

// Strategy: a few directories, each with a set of distinct file stems. Every
// directory gets its own pattern, and stems are prefixed with the directory
// index so names never collide across patterns.
fn layout_strategy() -> impl Strategy<Value = Vec<BTreeSet<String>>> {
    proptest::collection::vec(
        proptest::collection::btree_set("[a-z]{1,6}", 0..6),
        1..5,
    )
}

proptest! {
    #[test]
    fn key_count_equals_matched_file_count(layout in layout_strategy()) {
        let mut builder = MockProjectBuilder::new();
        let mut patterns = Vec::new();
        let mut expected = 0;
        for (i, stems) in layout.iter().enumerate() {
            for stem in stems {
                builder = builder.file(&format!("d{i}/{i}_{stem}.js"));
                expected += 1;
            }
            patterns.push(format!("d{i}/*.js"));
        }
        let project = builder.build();

        let resolver = Resolver::new(patterns, project.options()).unwrap();
        let entries = resolver.resolve_blocking().unwrap();

        prop_assert_eq!(entries.len(), expected);
        prop_assert_eq!(resolver.registrar().len(), layout.len());
    }

    #[test]
    fn repeated_resolution_is_deterministic(
        layout in layout_strategy(),
        keep_every in 1..4usize,
    ) {
        let mut builder = MockProjectBuilder::new();
        for (i, stems) in layout.iter().enumerate() {
            for stem in stems {
                builder = builder.file(&format!("src/d{i}/{stem}.js"));
            }
        }
        let project = builder.build();
        let options = project
            .options()
            .with_filter(move |_, index| index % keep_every == 0)
            .with_map_entry_name(|file, _| {
                file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
            });

        // Mapped names collide across directories; the result must still be
        // identical from one call to the next.
        let resolver = Resolver::new("src/**/*.js", options).unwrap();
        let first = resolver.resolve_blocking();
        let second = resolver.resolve_blocking();

        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a, b),
        }
    }
}

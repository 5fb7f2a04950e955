use std::collections::HashMap;

use suitesync_core::{completeness_case_name, derive_test_name, is_test_name, normalize_relative_path};

/// Fixture names taken from a real generated suite and the names its generator emitted for them.
const GENERATED: &[(&str, &str)] = &[
    ("pathPattern5.kts", "testPathPattern5_kts"),
    ("simpleEnvVars.kts", "testSimpleEnvVars_kts"),
    ("simple.customext", "testSimple_customext"),
    ("stringReceiver.kts", "testStringReceiver_kts"),
];

#[test]
fn derived_names_match_generator_output() {
    for (path, expected) in GENERATED {
        assert_eq!(derive_test_name(path), *expected, "name mismatch for {path}");
    }
}

#[test]
fn derived_names_are_valid_and_unique_for_generated_suite() {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (path, _) in GENERATED {
        let name = derive_test_name(path);
        assert!(is_test_name(&name), "not a test name: {name}");
        if let Some(prev) = seen.insert(name.clone(), path) {
            panic!("duplicate test name {name:?}: {prev:?} and {path:?}");
        }
    }
}

#[test]
fn names_ignore_separator_style() {
    assert_eq!(derive_test_name("dir/a.kts"), derive_test_name("dir\\a.kts"));
    assert_eq!(normalize_relative_path("dir\\a.kts"), "dir/a.kts");
}

#[test]
fn completeness_case_for_generated_suite() {
    assert_eq!(completeness_case_name("customScript"), "testAllFilesPresentInCustomScript");
    assert!(is_test_name(&completeness_case_name("customScript")));
}

//! Property-based tests for naming and drift detection
//!
//! These tests use proptest to check the manifest invariants over generated fixture sets rather than a few
//! hand-picked trees.

use std::collections::BTreeSet;
use std::fs;

use proptest::prelude::*;
use suitesync::{Registry, TestDataRoot, verify};
use suitesync_core::derive_test_name;

/// Fixture file names: lowercase stems with one of a few extensions, unique per set
fn fixture_names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        ("[a-z][a-z0-9]{0,7}", prop::sample::select(vec!["kts", "kt", "customext"]))
            .prop_map(|(stem, ext)| format!("{}.{}", stem, ext)),
        0..8,
    )
}

fn write_tree(files: &BTreeSet<String>) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    for file in files {
        fs::write(tmp.path().join(file), "").expect("write fixture");
    }
    tmp
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: derived names are deterministic and look like test names
    #[test]
    fn derived_names_are_stable(path in "[a-zA-Z0-9_./-]{1,24}") {
        let first = derive_test_name(&path);
        let second = derive_test_name(&path);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.starts_with("test"));
    }

    /// Property: path_for inverts name derivation for every registered entry
    #[test]
    fn path_for_inverts_derivation(files in fixture_names()) {
        let registry = Registry::from_paths(&files).expect("collision-free names");
        for file in &files {
            prop_assert_eq!(registry.path_for(&derive_test_name(file)).expect("registered"), file.as_str());
        }
    }

    /// Property: a registry built from the tree itself never drifts
    #[test]
    fn identical_sets_have_no_drift(files in fixture_names()) {
        let tmp = write_tree(&files);
        let registry = Registry::from_paths(&files).expect("registry");
        let result = verify(&TestDataRoot::new(tmp.path()), &registry).expect("verify");
        prop_assert!(result.is_clean());
    }

    /// Property: adding one file reports exactly that file as missing
    #[test]
    fn added_file_is_the_only_missing_path(files in fixture_names(), extra in "[a-z]{1,6}\\.new") {
        let tmp = write_tree(&files);
        let registry = Registry::from_paths(&files).expect("registry");
        fs::write(tmp.path().join(&extra), "").expect("write extra");

        let result = verify(&TestDataRoot::new(tmp.path()), &registry).expect("verify");
        prop_assert_eq!(result.missing_from_registry, BTreeSet::from([extra]));
        prop_assert!(result.stale_in_registry.is_empty());
    }

    /// Property: removing one file reports exactly that file as stale
    #[test]
    fn removed_file_is_the_only_stale_path(files in fixture_names().prop_filter("need a file", |f| !f.is_empty())) {
        let tmp = write_tree(&files);
        let registry = Registry::from_paths(&files).expect("registry");
        let removed = files.iter().next().expect("non-empty").clone();
        fs::remove_file(tmp.path().join(&removed)).expect("remove");

        let result = verify(&TestDataRoot::new(tmp.path()), &registry).expect("verify");
        prop_assert_eq!(result.stale_in_registry, BTreeSet::from([removed]));
        prop_assert!(result.missing_from_registry.is_empty());
    }
}

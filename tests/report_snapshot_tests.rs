//! Golden snapshot tests for user-facing report text
//!
//! The console report and the drift message are what a developer reads to find out which fixtures need a
//! regenerated manifest, so their layout is locked in here.
//!
//! Run with: `cargo test --test report_snapshot_tests`
//! Review changes: `cargo insta review`

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use suitesync::report::ConsoleReporter;
use suitesync::{
    ExecutionError, ManifestError, Registry, SuiteRunner, TestCaseEntry, TestDataRoot, TestOutcome,
    VerificationResult,
};

#[test]
fn test_drift_error_message() {
    let drift = VerificationResult {
        missing_from_registry: BTreeSet::from(["new.kts".to_string(), "sub/other.kts".to_string()]),
        stale_in_registry: BTreeSet::from(["c.kts".to_string()]),
    };
    insta::assert_snapshot!(ManifestError::Drift(drift).to_string(), @r"
    manifest is out of date with test data; regenerate it
    missing from manifest (2):
      + new.kts
      + sub/other.kts
    stale in manifest (1):
      - c.kts
    ");
}

#[test]
fn test_console_report_with_failure_and_drift() {
    let tmp = tempfile::tempdir().expect("tempdir");
    for file in ["a.kts", "b.customext", "new.kts"] {
        fs::write(tmp.path().join(file), "").expect("write fixture");
    }

    let registry = Registry::new(vec![
        TestCaseEntry::new("testA_kts", "a.kts"),
        TestCaseEntry::new("testB_customext", "b.customext"),
        TestCaseEntry::new("testC_kts", "c.kts"),
    ])
    .expect("registry")
    .with_completeness_case("testAllFilesPresentInCustomScript");

    let executor = |path: &Path| -> Result<TestOutcome, ExecutionError> {
        if path.ends_with("b.customext") {
            Ok(TestOutcome::Failed("expected OK, got FAIL".to_string()))
        } else {
            Ok(TestOutcome::Passed)
        }
    };

    let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
    SuiteRunner::default()
        .run(&TestDataRoot::new(tmp.path()), &registry, &executor, &mut reporter)
        .expect("run");
    let output = String::from_utf8(reporter.into_inner()).expect("utf-8 output");

    let root = regex::escape(&tmp.path().display().to_string());
    insta::with_settings!({filters => vec![
        (root.as_str(), "[ROOT]"),
        (r"\d+\.\d{2}s", "[DURATION]"),
    ]}, {
        insta::assert_snapshot!(output, @r"
        =================== test session starts ===================
        test data: [ROOT]
        testAllFilesPresentInCustomScript FAILED
        collected 3 item(s)

        a.kts::testA_kts PASSED
        b.customext::testB_customext FAILED
        c.kts::testC_kts PASSED

        =================== FAILURES ===================

        ___________ testB_customext ___________

            expected OK, got FAIL

            b.customext

        =================== MANIFEST DRIFT ===================

        ___________ testAllFilesPresentInCustomScript ___________

            manifest is out of date with test data; regenerate it
            missing from manifest (1):
              + new.kts
            stale in manifest (1):
              - c.kts

        =================== 2 passed, 1 failed, 2 drifted in [DURATION] ===================
        ");
    });
}

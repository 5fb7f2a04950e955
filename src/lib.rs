#![forbid(unsafe_code)]
//! suitesync: keep generated test manifests in sync with their test-data directories
//!
//! A test suite built from a fixture directory has two views of the same test set: the manifest produced by a
//! generator (one named case per fixture) and the directory itself. This crate discovers fixtures, checks the two
//! views agree in both directions, and dispatches each registered case to an external executor.
//!
//! ## Pipeline
//!
//! - [`scanner::scan`] walks a [`config::TestDataRoot`] using its [`matcher::PathMatcher`].
//! - [`verifier::verify`] compares the scan with a [`registry::Registry`] and reports drift.
//! - [`dispatcher::Dispatcher`] runs one case through a [`dispatcher::TestExecutor`].
//! - [`runner::SuiteRunner`] ties the above together for a whole run and feeds a [`report::TestReporter`].
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Executors**: a panicking executor is caught by the runner and recorded as a failure of that case only.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod manifest;
pub mod matcher;
pub mod registry;
pub mod report;
pub mod runner;
pub mod scanner;
pub mod verifier;
pub mod version;

pub use config::{DirectoryMode, TestDataRoot};
pub use dispatcher::{CaseState, Dispatcher, TestExecutor, TestOutcome};
pub use errors::{CaseExecutionFailure, ExecutionError, ManifestError, ManifestResult};
pub use manifest::{ManifestFile, Suite};
pub use matcher::{MatchAll, PathMatcher, RegexMatcher, matcher_for_pattern};
pub use registry::{Registry, TestCaseEntry};
pub use runner::{RunOptions, RunReport, SuiteRunner};
pub use scanner::scan;
pub use verifier::{VerificationResult, assert_all_present, verify};

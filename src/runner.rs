//! Suite runner: verify the manifest, then dispatch every selected case.
//!
//! ## Failure isolation
//!
//! - A configuration error aborts the run before any case executes.
//! - Manifest drift is reported once and fails the run, but every case still runs.
//! - An executor error or panic fails only the case it happened in; later cases still run and the failure is
//!   attributed to the case name in the report.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::TestDataRoot;
use crate::dispatcher::{CaseState, Dispatcher, TestExecutor, TestOutcome};
use crate::errors::{ManifestError, ManifestResult};
use crate::registry::{Registry, TestCaseEntry};
use crate::report::TestReporter;
use crate::verifier::{VerificationResult, verify};

/// Case selection for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run cases whose name contains this keyword
    pub keyword: Option<String>,
    /// Only run cases carrying every one of these tags
    pub tags: Vec<String>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn selects(&self, entry: &TestCaseEntry) -> bool {
        if let Some(keyword) = &self.keyword {
            if !entry.name.contains(keyword.as_str()) {
                return false;
            }
        }
        self.tags.iter().all(|tag| entry.has_tag(tag))
    }
}

/// Result of one dispatched case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRecord {
    pub name: String,
    pub relative_path: String,
    pub state: CaseState,
    /// Failure details, executor error, or panic message
    pub detail: Option<String>,
    pub duration: Duration,
}

impl CaseRecord {
    fn pending(entry: &TestCaseEntry) -> Self {
        Self {
            name: entry.name.clone(),
            relative_path: entry.relative_path.clone(),
            state: CaseState::Pending,
            detail: None,
            duration: Duration::ZERO,
        }
    }

    fn transition(&mut self, next: CaseState) {
        match self.state.advance(next) {
            Some(state) => self.state = state,
            None => tracing::error!(case = %self.name, from = %self.state, to = %next, "invalid case transition"),
        }
    }

    pub fn passed(&self) -> bool {
        self.state == CaseState::Passed
    }
}

/// Counts for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Paths in either drift direction
    pub drifted: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub completeness_case: Option<String>,
    pub drift: VerificationResult,
    pub cases: Vec<CaseRecord>,
    pub duration: Duration,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        let passed = self.cases.iter().filter(|c| c.passed()).count();
        RunSummary {
            total: self.cases.len(),
            passed,
            failed: self.cases.len() - passed,
            drifted: self.drift.missing_from_registry.len() + self.drift.stale_in_registry.len(),
        }
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseRecord> {
        self.cases.iter().filter(|c| !c.passed())
    }

    /// `true` iff there is no drift and every dispatched case passed.
    pub fn is_success(&self) -> bool {
        self.drift.is_clean() && self.cases.iter().all(CaseRecord::passed)
    }

    /// Process exit status for this run.
    pub fn exit_status(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }

    /// The drift of this run as a `Drift` error, if any.
    pub fn drift_error(&self) -> Option<ManifestError> {
        (!self.drift.is_clean()).then(|| ManifestError::Drift(self.drift.clone()))
    }
}

/// Runs a whole suite sequentially.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    options: RunOptions,
}

impl SuiteRunner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Verify `registry` against `root`, then dispatch every selected case.
    ///
    /// ## Errors
    /// - Only run-level errors (`Configuration`, `Io`). Drift and case failures are part of the report.
    #[tracing::instrument(skip_all, fields(root = %root.absolute_path().display(), cases = registry.len()))]
    pub fn run(
        &self,
        root: &TestDataRoot,
        registry: &Registry,
        executor: &dyn TestExecutor,
        reporter: &mut dyn TestReporter,
    ) -> ManifestResult<RunReport> {
        let start = Instant::now();

        reporter.on_scan_start(root.absolute_path());
        let drift = verify(root, registry)?;
        reporter.on_completeness_check(registry.completeness_case(), &drift);

        let selected: Vec<&TestCaseEntry> = registry.iter().filter(|e| self.options.selects(e)).collect();
        reporter.on_collection_complete(selected.len());

        let dispatcher = Dispatcher::new(root, executor);
        let mut cases = Vec::with_capacity(selected.len());
        for entry in selected {
            reporter.on_case_start(entry);
            let record = run_case(&dispatcher, entry);
            reporter.on_case_complete(&record);
            cases.push(record);
        }

        let report = RunReport {
            completeness_case: registry.completeness_case().map(str::to_string),
            drift,
            cases,
            duration: start.elapsed(),
        };

        let summary = report.summary();
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            drifted = summary.drifted,
            "run complete"
        );
        reporter.on_run_complete(&report);
        Ok(report)
    }
}

fn run_case(dispatcher: &Dispatcher<'_>, entry: &TestCaseEntry) -> CaseRecord {
    let mut record = CaseRecord::pending(entry);
    record.transition(CaseState::Running);

    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(entry)));
    record.duration = started.elapsed();

    match result {
        Ok(Ok(TestOutcome::Passed)) => record.transition(CaseState::Passed),
        Ok(Ok(TestOutcome::Failed(details))) => {
            record.detail = Some(details);
            record.transition(CaseState::Failed);
        }
        Ok(Err(failure)) => {
            tracing::warn!(case = %entry.name, error = %failure.source, "executor error");
            record.detail = Some(failure.to_string());
            record.transition(CaseState::Failed);
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(case = %entry.name, %message, "executor panicked");
            record.detail = Some(format!("test case '{}' panicked: {}", entry.name, message));
            record.transition(CaseState::Failed);
        }
    }
    record
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

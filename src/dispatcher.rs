//! Per-case dispatch to the external execution callback.
//!
//! The dispatcher resolves a registered path against the root, calls the executor exactly once and returns what
//! it said. It never retries: execution is assumed deterministic, and a flaky case is a defect upstream.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::TestDataRoot;
use crate::errors::{CaseExecutionFailure, ExecutionError, ManifestError, ManifestResult};
use crate::registry::{Registry, TestCaseEntry};

/// What the executor reported for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "details", rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed(String),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Runs the logic of one test case given its resolved fixture path.
///
/// Returning `Err` is the "execution raised" outcome; it is propagated, never swallowed.
pub trait TestExecutor {
    fn execute(&self, path: &Path) -> Result<TestOutcome, ExecutionError>;
}

impl<F> TestExecutor for F
where
    F: Fn(&Path) -> Result<TestOutcome, ExecutionError>,
{
    fn execute(&self, path: &Path) -> Result<TestOutcome, ExecutionError> {
        self(path)
    }
}

/// Lifecycle of a case within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseState {
    Pending,
    Running,
    Passed,
    Failed,
}

impl CaseState {
    /// Move to `next`, allowing only `Pending -> Running -> {Passed, Failed}`.
    pub fn advance(self, next: CaseState) -> Option<CaseState> {
        match (self, next) {
            (Self::Pending, Self::Running) | (Self::Running, Self::Passed) | (Self::Running, Self::Failed) => {
                Some(next)
            }
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Dispatches registry entries to a [`TestExecutor`].
pub struct Dispatcher<'a> {
    root: &'a TestDataRoot,
    executor: &'a dyn TestExecutor,
}

impl<'a> Dispatcher<'a> {
    pub fn new(root: &'a TestDataRoot, executor: &'a dyn TestExecutor) -> Self {
        Self { root, executor }
    }

    /// Run one case and pass its outcome through unchanged.
    ///
    /// ## Errors
    /// - `CaseExecutionFailure` carrying the entry's name if the executor returns an error.
    #[tracing::instrument(skip_all, fields(case = %entry.name))]
    pub fn dispatch(&self, entry: &TestCaseEntry) -> Result<TestOutcome, CaseExecutionFailure> {
        let path = self.root.resolve(&entry.relative_path);
        tracing::debug!(path = %path.display(), "executing");
        self.executor.execute(&path).map_err(|source| CaseExecutionFailure {
            name: entry.name.clone(),
            path,
            source,
        })
    }

    /// Look a case up by name, then dispatch it.
    ///
    /// ## Errors
    /// - `NotFound` if `name` is not registered.
    /// - `CaseExecution` if the executor fails.
    pub fn dispatch_named(&self, registry: &Registry, name: &str) -> ManifestResult<TestOutcome> {
        let entry = registry.get(name).ok_or_else(|| ManifestError::not_found(name))?;
        Ok(self.dispatch(entry)?)
    }
}

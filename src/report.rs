//! Run reporting (pytest-style console output and JSON)
//!
//! ## TestReporter Trait
//!
//! The suite runner drives a `TestReporter` instead of printing directly. This keeps execution independent of
//! output format; `ConsoleReporter` and `JsonReporter` are the two formats the CLI offers.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use crate::registry::TestCaseEntry;
use crate::runner::{CaseRecord, RunReport};
use crate::verifier::VerificationResult;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

/// Trait for reporting suite runs.
pub trait TestReporter {
    /// Called before the test-data root is scanned
    fn on_scan_start(&mut self, _root: &Path) {}

    /// Called once with the completeness check result
    fn on_completeness_check(&mut self, case_name: Option<&str>, result: &VerificationResult);

    /// Called when case selection is complete
    fn on_collection_complete(&mut self, case_count: usize);

    /// Called before a case is dispatched
    fn on_case_start(&mut self, _entry: &TestCaseEntry) {}

    /// Called when a case reached a terminal state
    fn on_case_complete(&mut self, record: &CaseRecord);

    /// Called when all cases have completed
    fn on_run_complete(&mut self, report: &RunReport);
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl TestReporter for SilentReporter {
    fn on_completeness_check(&mut self, _case_name: Option<&str>, _result: &VerificationResult) {}
    fn on_collection_complete(&mut self, _case_count: usize) {}
    fn on_case_complete(&mut self, _record: &CaseRecord) {}
    fn on_run_complete(&mut self, _report: &RunReport) {}
}

/// Default console reporter (pytest-style)
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &'static str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    // Reporting is best effort: a closed stdout must not turn a passing run into a failure.
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
    }

    fn section(&mut self, title: &str, code: &'static str) {
        let line = self.paint(code, &format!("=================== {} ===================", title));
        self.emit(format_args!("\n{}\n", line));
    }

    fn case_block(&mut self, name: &str, body: &str) {
        let header = self.paint(BOLD, &format!("___________ {} ___________", name));
        self.emit(format_args!("\n{}\n\n", header));
        for line in body.lines() {
            if line.is_empty() {
                self.emit(format_args!("\n"));
            } else {
                self.emit(format_args!("    {}\n", line));
            }
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_scan_start(&mut self, root: &Path) {
        let banner = self.paint(BOLD, "=================== test session starts ===================");
        self.emit(format_args!("{}\ntest data: {}\n", banner, root.display()));
    }

    fn on_completeness_check(&mut self, case_name: Option<&str>, result: &VerificationResult) {
        let name = case_name.unwrap_or("all files present");
        let status = if result.is_clean() {
            self.paint(GREEN, "PASSED")
        } else {
            self.paint(RED, "FAILED")
        };
        self.emit(format_args!("{} {}\n", name, status));
    }

    fn on_collection_complete(&mut self, case_count: usize) {
        if case_count == 0 {
            self.emit(format_args!("no tests collected\n"));
        } else {
            self.emit(format_args!("collected {} item(s)\n\n", case_count));
        }
    }

    fn on_case_start(&mut self, entry: &TestCaseEntry) {
        if self.verbose {
            self.emit(format_args!("{}::{} ... ", entry.relative_path, entry.name));
        }
    }

    fn on_case_complete(&mut self, record: &CaseRecord) {
        let status = if record.passed() {
            self.paint(GREEN, "PASSED")
        } else {
            self.paint(RED, "FAILED")
        };

        if self.verbose {
            self.emit(format_args!("{} ({}ms)\n", status, record.duration.as_millis()));
        } else {
            self.emit(format_args!("{}::{} {}\n", record.relative_path, record.name, status));
        }
    }

    fn on_run_complete(&mut self, report: &RunReport) {
        let failures: Vec<&CaseRecord> = report.failed_cases().collect();
        if !failures.is_empty() {
            self.section("FAILURES", BOLD_RED);
            for record in failures {
                let detail = record.detail.as_deref().unwrap_or("failed");
                self.case_block(&record.name, &format!("{}\n\n{}", detail, record.relative_path));
            }
        }

        if !report.drift.is_clean() {
            self.section("MANIFEST DRIFT", BOLD_RED);
            let name = report.completeness_case.as_deref().unwrap_or("all files present");
            self.case_block(name, &report.drift.to_string());
        }

        let summary = report.summary();
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.drifted > 0 {
            parts.push(format!("{} drifted", summary.drifted));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let code = if report.is_success() { BOLD_GREEN } else { BOLD_RED };
        let line = self.paint(
            code,
            &format!(
                "=================== {} in {:.2}s ===================",
                parts.join(", "),
                report.duration.as_secs_f64()
            ),
        );
        self.emit(format_args!("\n{}\n", line));
        let _ = self.out.flush();
    }
}

/// Writes the final [`RunReport`] as a single JSON document.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_completeness_check(&mut self, _case_name: Option<&str>, _result: &VerificationResult) {}
    fn on_collection_complete(&mut self, _case_count: usize) {}
    fn on_case_complete(&mut self, _record: &CaseRecord) {}

    fn on_run_complete(&mut self, report: &RunReport) {
        if let Err(e) = serde_json::to_writer_pretty(&mut self.out, report) {
            tracing::error!(error = %e, "failed to write JSON report");
            return;
        }
        let _ = writeln!(self.out);
    }
}

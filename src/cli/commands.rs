//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::{Path, PathBuf};

use suitesync_core::derive_test_name;

use crate::config::{DirectoryMode, TestDataRoot, resolve_project_root};
use crate::manifest::Suite;
use crate::matcher::matcher_for_pattern;
use crate::report::{ConsoleReporter, JsonReporter, TestReporter};
use crate::runner::{RunOptions, SuiteRunner};
use crate::scanner::scan;
use crate::verifier::verify;

use super::executor::CommandExecutor;
use super::{CliError, CliResult, ExitCode, ReportFormat};

/// Arguments of `suitesync scan`.
pub struct ScanArgs {
    pub root: PathBuf,
    pub pattern: String,
    pub recursive: bool,
    pub directory_mode: DirectoryMode,
    pub exclude: Vec<String>,
}

/// Arguments of `suitesync run`.
pub struct RunArgs {
    pub manifest: PathBuf,
    pub project_root: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub filter: Option<String>,
    pub tags: Vec<String>,
    pub format: ReportFormat,
    pub color: bool,
    pub exec: Vec<String>,
}

/// List what a test-data root currently contains.
pub fn scan_root(args: &ScanArgs, with_names: bool) -> CliResult<ExitCode> {
    let mut root = TestDataRoot::new(&args.root)
        .with_matcher(matcher_for_pattern(&args.pattern)?)
        .with_recursive(args.recursive)
        .with_directory_mode(args.directory_mode);
    for dir in &args.exclude {
        root = root.with_excluded_dir(dir.clone());
    }

    for path in scan(&root)? {
        let path = path?;
        if with_names {
            println!("{}\t{}", derive_test_name(&path), path);
        } else {
            println!("{}", path);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Check a manifest against the files on disk.
pub fn verify_manifest(manifest: &Path, project_root: Option<&Path>, root: Option<&Path>) -> CliResult<ExitCode> {
    let project_root = resolve_project_root(project_root)?;
    let suite = Suite::load(manifest, &project_root, root)?;
    let result = verify(&suite.root, &suite.registry)?;

    if result.is_clean() {
        println!(
            "{} in sync: {} case(s) under {}",
            manifest.display(),
            suite.registry.len(),
            suite.root.absolute_path().display()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(result.to_string()))
    }
}

/// Verify a manifest and dispatch every selected case to an external command.
pub fn run_suite(args: &RunArgs) -> CliResult<ExitCode> {
    let Some((program, program_args)) = args.exec.split_first() else {
        return Err(CliError::new(
            "Error: run requires an executor command after `--`",
            ExitCode::CONFIGURATION,
        ));
    };

    let project_root = resolve_project_root(args.project_root.as_deref())?;
    let suite = Suite::load(&args.manifest, &project_root, args.root.as_deref())?;
    let executor = CommandExecutor::new(program, program_args.to_vec());

    let mut options = RunOptions::new();
    if let Some(filter) = &args.filter {
        options = options.with_keyword(filter.clone());
    }
    for tag in &args.tags {
        options = options.with_tag(tag.clone());
    }

    let mut reporter: Box<dyn TestReporter> = match args.format {
        ReportFormat::Console => Box::new(ConsoleReporter::stdout(args.verbose).with_color(args.color)),
        ReportFormat::Json => Box::new(JsonReporter::stdout()),
    };

    let report = SuiteRunner::new(options).run(&suite.root, &suite.registry, &executor, reporter.as_mut())?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Failures and drift were already printed by the reporter
        Err(CliError::new("", ExitCode(report.exit_status())))
    }
}

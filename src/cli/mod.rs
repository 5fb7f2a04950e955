//! CLI module for suitesync
//!
//! ## Commands
//!
//! - `scan <root>` - List the fixtures a root currently contains
//! - `verify <manifest>` - Check a manifest against its test-data root
//! - `run <manifest> -- <cmd>...` - Verify, then run every case through an external command
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod executor;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DirectoryMode;
use crate::errors::ManifestError;
use crate::version::SUITESYNC_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Drift or failing cases
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run could not start (bad root, bad manifest)
    pub const CONFIGURATION: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ManifestError> for CliError {
    fn from(err: ManifestError) -> Self {
        let exit_code = if err.is_fatal() {
            ExitCode::CONFIGURATION
        } else {
            ExitCode::FAILURE
        };
        Self::new(format!("Error: {}", err), exit_code)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Keep generated test manifests in sync with their test-data directories
#[derive(Parser, Debug)]
#[command(name = "suitesync")]
#[command(version = SUITESYNC_VERSION)]
#[command(about = "Keep generated test manifests in sync with their test-data directories", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory that manifest paths are relative to (default: $SUITESYNC_PROJECT_ROOT, then cwd)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Disable ANSI colours in reports
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format of `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the fixtures currently present under a test-data root
    Scan {
        /// Test-data root directory
        #[arg(value_name = "ROOT")]
        root: PathBuf,
        /// File-name pattern (anchored regular expression)
        #[arg(long, default_value = "^(.*)$")]
        pattern: String,
        /// Only look at direct children of the root
        #[arg(long)]
        no_recursive: bool,
        /// Treat matching directories as single test cases
        #[arg(long)]
        units: bool,
        /// Skip directories with this name (repeatable)
        #[arg(long = "exclude", value_name = "DIR")]
        exclude: Vec<String>,
        /// Print the derived test name next to each path
        #[arg(long)]
        names: bool,
    },

    /// Check a manifest against the files on disk
    Verify {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Override the manifest's test-data root
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Verify a manifest, then run every case through an external command
    Run {
        /// Manifest file (JSON)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Override the manifest's test-data root
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Only run cases whose name contains EXPR
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Only run cases carrying this tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
        /// Executor command; the fixture path is appended as its last argument
        #[arg(last = true, required = true, value_name = "CMD")]
        exec: Vec<String>,
    },
}

impl Command {
    fn directory_mode(units: bool) -> DirectoryMode {
        if units { DirectoryMode::Units } else { DirectoryMode::Files }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let color = !cli.no_color;
    match cli.command {
        Command::Scan {
            root,
            pattern,
            no_recursive,
            units,
            exclude,
            names,
        } => commands::scan_root(
            &commands::ScanArgs {
                root,
                pattern,
                recursive: !no_recursive,
                directory_mode: Command::directory_mode(units),
                exclude,
            },
            names,
        ),
        Command::Verify { manifest, root } => {
            commands::verify_manifest(&manifest, cli.project_root.as_deref(), root.as_deref())
        }
        Command::Run {
            manifest,
            root,
            verbose,
            filter,
            tags,
            format,
            exec,
        } => commands::run_suite(&commands::RunArgs {
            manifest,
            project_root: cli.project_root,
            root,
            verbose,
            filter,
            tags,
            format,
            color,
            exec,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! External-command executor used by `suitesync run`.

use std::path::Path;
use std::process::Command;

use crate::dispatcher::{TestExecutor, TestOutcome};
use crate::errors::ExecutionError;

/// Runs `program args... <fixture path>` once per case.
///
/// Exit status 0 is a pass, any other status a failure carrying the captured output. Failing to start the
/// program at all is an executor error.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: String,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl TestExecutor for CommandExecutor {
    fn execute(&self, path: &Path) -> Result<TestOutcome, ExecutionError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| format!("failed to run '{}': {}", self.program, e))?;

        if output.status.success() {
            return Ok(TestOutcome::Passed);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = match output.status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let details = format!("{}\n{}{}", status, stdout, stderr);
        Ok(TestOutcome::Failed(details.trim_end().to_string()))
    }
}

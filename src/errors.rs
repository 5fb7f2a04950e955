//! Error taxonomy for manifest scanning, verification and dispatch.
//!
//! - [`ManifestError::Configuration`] is fatal for a run: nothing meaningful can be reported without a valid root.
//! - [`ManifestError::Drift`] fails the run but never stops individual cases from executing.
//! - [`CaseExecutionFailure`] is always attributed to one test name.

use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::verifier::VerificationResult;

/// Error reported by an execution callback.
pub type ExecutionError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by the manifest machinery.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("{0}")]
    Drift(VerificationResult),

    #[error("test case '{name}' is not registered in the manifest")]
    NotFound { name: String },

    #[error("duplicate {kind} '{value}' in manifest")]
    DuplicateEntry { kind: &'static str, value: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    CaseExecution(#[from] CaseExecutionFailure),
}

impl ManifestError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Io { .. } | Self::DuplicateEntry { .. })
    }
}

pub type ManifestResult<T> = Result<T, ManifestError>;

/// An execution callback failed (returned an error or panicked) while running one case.
#[derive(Debug, Error)]
#[error("test case '{name}' ({}) failed to execute: {source}", path.display())]
pub struct CaseExecutionFailure {
    pub name: String,
    pub path: PathBuf,
    #[source]
    pub source: ExecutionError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_is_fatal() {
        assert!(ManifestError::configuration("missing root").is_fatal());
        assert!(!ManifestError::not_found("testA_kts").is_fatal());
    }

    #[test]
    fn test_case_failure_mentions_name_and_path() {
        let failure = CaseExecutionFailure {
            name: "testA_kts".to_string(),
            path: PathBuf::from("data/a.kts"),
            source: "compiler crashed".into(),
        };
        let message = failure.to_string();
        assert!(message.contains("testA_kts"));
        assert!(message.contains("data/a.kts"));
        assert!(message.contains("compiler crashed"));
    }
}

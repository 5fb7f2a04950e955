//! Test-data root configuration.
//!
//! A [`TestDataRoot`] is built once at the start of a run and handed by reference to the scanner, verifier and
//! dispatcher. Nothing mutates it afterwards.

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ManifestError, ManifestResult};
use crate::matcher::{MatchAll, PathMatcher};

/// Environment variable consulted when no project root is given on the command line.
pub const PROJECT_ROOT_ENV: &str = "SUITESYNC_PROJECT_ROOT";

/// How directories inside the test-data root are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryMode {
    /// Only files are test entries; directories are walked (when recursive) but never matched.
    #[default]
    Files,
    /// A directory whose name matches the pattern is one test entry (a multi-file case) and is not descended.
    Units,
}

/// Directory holding the fixtures of one test suite.
#[derive(Debug)]
pub struct TestDataRoot {
    absolute_path: PathBuf,
    matcher: Box<dyn PathMatcher>,
    recursive: bool,
    directory_mode: DirectoryMode,
    exclude_dirs: BTreeSet<String>,
}

impl TestDataRoot {
    /// Create a recursive, match-everything root at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            absolute_path: path.into(),
            matcher: Box::new(MatchAll),
            recursive: true,
            directory_mode: DirectoryMode::default(),
            exclude_dirs: BTreeSet::new(),
        }
    }

    /// Set the file-name matcher
    pub fn with_matcher(mut self, matcher: Box<dyn PathMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set whether subdirectories are walked
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the directory treatment
    pub fn with_directory_mode(mut self, mode: DirectoryMode) -> Self {
        self.directory_mode = mode;
        self
    }

    /// Skip every directory with this name during the walk
    pub fn with_excluded_dir(mut self, name: impl Into<String>) -> Self {
        self.exclude_dirs.insert(name.into());
        self
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn matcher(&self) -> &dyn PathMatcher {
        self.matcher.as_ref()
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn directory_mode(&self) -> DirectoryMode {
        self.directory_mode
    }

    pub fn is_excluded(&self, directory_name: &str) -> bool {
        self.exclude_dirs.contains(directory_name)
    }

    /// Last component of the root path (used to name the completeness case).
    pub fn directory_name(&self) -> Option<&str> {
        self.absolute_path.file_name().and_then(|n| n.to_str())
    }

    /// Resolve a `/`-separated relative fixture path against this root.
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.absolute_path.clone(), |acc, segment| acc.join(segment))
    }

    /// Fail unless the root exists and is a directory.
    pub fn ensure_directory(&self) -> ManifestResult<()> {
        if !self.absolute_path.exists() {
            return Err(ManifestError::configuration(format!(
                "test-data root '{}' does not exist",
                self.absolute_path.display()
            )));
        }
        if !self.absolute_path.is_dir() {
            return Err(ManifestError::configuration(format!(
                "test-data root '{}' is not a directory",
                self.absolute_path.display()
            )));
        }
        Ok(())
    }
}

/// Find the project root that manifest-relative paths are resolved against.
///
/// Lookup order: the explicit value, then `SUITESYNC_PROJECT_ROOT`, then the current directory.
pub fn resolve_project_root(explicit: Option<&Path>) -> ManifestResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(from_env) = env::var(PROJECT_ROOT_ENV) {
        if !from_env.is_empty() {
            return Ok(PathBuf::from(from_env));
        }
    }

    env::current_dir()
        .map_err(|e| ManifestError::configuration(format!("cannot determine current directory: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let root = TestDataRoot::new("data");
        assert!(root.is_recursive());
        assert_eq!(root.directory_mode(), DirectoryMode::Files);
        assert!(root.matcher().matches("x.kts"));
        assert!(!root.is_excluded("target"));
    }

    #[test]
    fn test_builder_methods() {
        let root = TestDataRoot::new("data")
            .with_recursive(false)
            .with_directory_mode(DirectoryMode::Units)
            .with_excluded_dir("target");
        assert!(!root.is_recursive());
        assert_eq!(root.directory_mode(), DirectoryMode::Units);
        assert!(root.is_excluded("target"));
    }

    #[test]
    fn test_resolve_joins_segments() {
        let root = TestDataRoot::new("data");
        assert_eq!(root.resolve("sub/a.kts"), Path::new("data").join("sub").join("a.kts"));
    }

    #[test]
    fn test_directory_name() {
        let root = TestDataRoot::new("compiler/testData/codegen/customScript");
        assert_eq!(root.directory_name(), Some("customScript"));
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        let root = TestDataRoot::new("definitely/not/a/real/dir");
        assert!(matches!(
            root.ensure_directory(),
            Err(ManifestError::Configuration { .. })
        ));
    }

    #[test]
    fn test_explicit_project_root_wins() {
        let resolved = resolve_project_root(Some(Path::new("/srv/project"))).ok();
        assert_eq!(resolved, Some(PathBuf::from("/srv/project")));
    }
}

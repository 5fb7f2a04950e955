//! The generated manifest artifact.
//!
//! A manifest is a JSON document written by an external generator: the test-data root, the pattern used to
//! select fixtures, and the `(name, path)` pairs it found, plus the name of the synthetic completeness case.
//!
//! ```json
//! {
//!   "test_data_root": "compiler/testData/codegen/customScript",
//!   "pattern": "^(.*)$",
//!   "recursive": true,
//!   "cases": [{ "name": "testSimple_customext", "path": "simple.customext" }]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use suitesync_core::completeness_case_name;

use crate::config::{DirectoryMode, TestDataRoot};
use crate::errors::{ManifestError, ManifestResult};
use crate::matcher::matcher_for_pattern;
use crate::registry::{Registry, TestCaseEntry};

fn default_pattern() -> String {
    "^(.*)$".to_string()
}

fn default_recursive() -> bool {
    true
}

/// On-disk form of a generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Test-data directory, relative to the project root unless absolute
    pub test_data_root: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub directory_mode: DirectoryMode,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    /// Name of the synthetic "all files present" case (derived from the root's directory name when absent)
    #[serde(default)]
    pub completeness_case: Option<String>,
    pub cases: Vec<CaseSpec>,
}

/// One `(name, path)` pair of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseSpec {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ManifestFile {
    /// Parse a manifest from JSON text.
    pub fn parse(text: &str) -> ManifestResult<Self> {
        serde_json::from_str(text).map_err(|e| ManifestError::configuration(format!("malformed manifest: {}", e)))
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ManifestError::configuration(format!("cannot read manifest '{}': {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Build the [`TestDataRoot`] this manifest describes.
    ///
    /// ## Parameters
    /// - `project_root`: directory that a relative `test_data_root` is resolved against.
    /// - `root_override`: replaces `test_data_root` entirely when given.
    pub fn test_data_root(&self, project_root: &Path, root_override: Option<&Path>) -> ManifestResult<TestDataRoot> {
        let path = match root_override {
            Some(path) => path.to_path_buf(),
            None => project_root.join(&self.test_data_root),
        };

        let mut root = TestDataRoot::new(path)
            .with_matcher(matcher_for_pattern(&self.pattern)?)
            .with_recursive(self.recursive)
            .with_directory_mode(self.directory_mode);
        for dir in &self.exclude_dirs {
            root = root.with_excluded_dir(dir.clone());
        }
        Ok(root)
    }

    /// Build the [`Registry`] of expected cases, keeping manifest order.
    pub fn registry(&self) -> ManifestResult<Registry> {
        let entries = self
            .cases
            .iter()
            .map(|case| TestCaseEntry {
                tags: case.tags.clone(),
                ..TestCaseEntry::new(case.name.clone(), &case.path)
            })
            .collect();

        let registry = Registry::new(entries)?;
        let Some(name) = self.completeness_case_name() else {
            return Ok(registry);
        };
        // The completeness case shares the test-name namespace with the cases.
        if registry.get(&name).is_some() {
            return Err(ManifestError::DuplicateEntry { kind: "test name", value: name });
        }
        Ok(registry.with_completeness_case(name))
    }

    fn completeness_case_name(&self) -> Option<String> {
        self.completeness_case.clone().or_else(|| {
            Path::new(&self.test_data_root)
                .file_name()
                .and_then(|n| n.to_str())
                .map(completeness_case_name)
        })
    }
}

/// A manifest resolved into the two read-only inputs of a run.
#[derive(Debug)]
pub struct Suite {
    pub root: TestDataRoot,
    pub registry: Registry,
}

impl Suite {
    /// Load a manifest file and resolve it against `project_root`.
    #[tracing::instrument(skip_all, fields(manifest = %manifest_path.display()))]
    pub fn load(manifest_path: &Path, project_root: &Path, root_override: Option<&Path>) -> ManifestResult<Self> {
        let manifest = ManifestFile::load(manifest_path)?;
        let root = manifest.test_data_root(project_root, root_override)?;
        let registry = manifest.registry()?;
        tracing::debug!(
            root = %root.absolute_path().display(),
            cases = registry.len(),
            "manifest loaded"
        );
        Ok(Self { root, registry })
    }
}

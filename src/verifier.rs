//! Completeness check between the manifest and the fixture tree.
//!
//! Drift is reported in both directions and the two directions are never merged: a file missing from the
//! registry and a registry entry whose file disappeared both mean "regenerate", but they point at different
//! files.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::config::TestDataRoot;
use crate::errors::{ManifestError, ManifestResult};
use crate::registry::Registry;
use crate::scanner::scan;

/// Outcome of comparing a registry with a live scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// On disk, but no generated test case
    pub missing_from_registry: BTreeSet<String>,
    /// Generated test case, but the file is gone
    pub stale_in_registry: BTreeSet<String>,
}

impl VerificationResult {
    pub fn is_clean(&self) -> bool {
        self.missing_from_registry.is_empty() && self.stale_in_registry.is_empty()
    }

    /// Convert a non-empty result into a `Drift` error.
    pub fn into_result(self) -> ManifestResult<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(ManifestError::Drift(self))
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "manifest matches test data");
        }

        writeln!(f, "manifest is out of date with test data; regenerate it")?;
        write!(f, "missing from manifest ({}):", self.missing_from_registry.len())?;
        for path in &self.missing_from_registry {
            write!(f, "\n  + {}", path)?;
        }
        write!(f, "\nstale in manifest ({}):", self.stale_in_registry.len())?;
        for path in &self.stale_in_registry {
            write!(f, "\n  - {}", path)?;
        }
        Ok(())
    }
}

/// Compare the live fixture tree with the registry.
///
/// ## Errors
/// - `Configuration` if the root is invalid.
/// - `Io` if the walk fails below the root.
#[tracing::instrument(skip_all, fields(root = %root.absolute_path().display(), cases = registry.len()))]
pub fn verify(root: &TestDataRoot, registry: &Registry) -> ManifestResult<VerificationResult> {
    let live = scan(root)?.collect::<ManifestResult<BTreeSet<String>>>()?;
    let known: BTreeSet<String> = registry.relative_paths().into_iter().map(str::to_string).collect();

    let result = VerificationResult {
        missing_from_registry: live.difference(&known).cloned().collect(),
        stale_in_registry: known.difference(&live).cloned().collect(),
    };

    if result.is_clean() {
        tracing::debug!(files = live.len(), "no drift");
    } else {
        tracing::warn!(
            missing = result.missing_from_registry.len(),
            stale = result.stale_in_registry.len(),
            "manifest drift detected"
        );
    }
    Ok(result)
}

/// Verify and fail with `Drift` unless the registry matches the tree exactly.
pub fn assert_all_present(root: &TestDataRoot, registry: &Registry) -> ManifestResult<()> {
    verify(root, registry)?.into_result()
}

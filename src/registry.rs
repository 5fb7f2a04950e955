//! The expected test set: an immutable, ordered list of named fixture paths.
//!
//! A registry is regenerated wholesale by the manifest generator whenever the fixture tree changes; there is no
//! API to patch one at runtime.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use suitesync_core::{derive_test_name, normalize_relative_path};

use crate::errors::{ManifestError, ManifestResult};

/// One expected test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCaseEntry {
    pub name: String,
    pub relative_path: String,
    pub tags: BTreeSet<String>,
}

impl TestCaseEntry {
    /// Create an entry with an explicit name.
    pub fn new(name: impl Into<String>, relative_path: &str) -> Self {
        Self {
            name: name.into(),
            relative_path: normalize_relative_path(relative_path),
            tags: BTreeSet::new(),
        }
    }

    /// Create an entry whose name is derived from its path.
    pub fn from_path(relative_path: &str) -> Self {
        Self::new(derive_test_name(relative_path), relative_path)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Ordered collection of [`TestCaseEntry`] values with unique names and paths.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<TestCaseEntry>,
    by_name: HashMap<String, usize>,
    completeness_case: Option<String>,
}

impl Registry {
    /// Build a registry, keeping the given order.
    ///
    /// ## Errors
    /// - `DuplicateEntry` if two entries share a name or a relative path.
    pub fn new(entries: Vec<TestCaseEntry>) -> ManifestResult<Self> {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut paths = HashSet::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if by_name.insert(entry.name.clone(), index).is_some() {
                return Err(ManifestError::DuplicateEntry {
                    kind: "test name",
                    value: entry.name.clone(),
                });
            }
            if !paths.insert(entry.relative_path.as_str()) {
                return Err(ManifestError::DuplicateEntry {
                    kind: "path",
                    value: entry.relative_path.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            by_name,
            completeness_case: None,
        })
    }

    /// Build a registry from fixture paths, deriving every name.
    pub fn from_paths<I, S>(paths: I) -> ManifestResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(paths.into_iter().map(|p| TestCaseEntry::from_path(p.as_ref())).collect())
    }

    /// Attach the name of the synthetic "all files present" case.
    pub fn with_completeness_case(mut self, name: impl Into<String>) -> Self {
        self.completeness_case = Some(name.into());
        self
    }

    pub fn completeness_case(&self) -> Option<&str> {
        self.completeness_case.as_deref()
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn relative_paths(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.relative_path.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&TestCaseEntry> {
        self.by_name.get(name).map(|&index| &self.entries[index])
    }

    /// Look up the fixture path registered for `name`.
    ///
    /// ## Errors
    /// - `NotFound` if no entry carries that name. Callers must not treat this as "skip".
    pub fn path_for(&self, name: &str) -> ManifestResult<&str> {
        self.get(name)
            .map(|entry| entry.relative_path.as_str())
            .ok_or_else(|| ManifestError::not_found(name))
    }

    pub fn entries(&self) -> &[TestCaseEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCaseEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestCaseEntry;
    type IntoIter = std::slice::Iter<'a, TestCaseEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Registry {
        Registry::new(vec![
            TestCaseEntry::new("testA_kts", "a.kts"),
            TestCaseEntry::new("testB_customext", "b.customext").with_tag("customext"),
        ])
        .unwrap()
    }

    #[test]
    fn test_names_and_paths() {
        let registry = sample();
        assert_eq!(registry.names(), BTreeSet::from(["testA_kts", "testB_customext"]));
        assert_eq!(registry.relative_paths(), BTreeSet::from(["a.kts", "b.customext"]));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_path_for() {
        let registry = sample();
        assert_eq!(registry.path_for("testB_customext").unwrap(), "b.customext");
    }

    #[test]
    fn test_path_for_unknown_name_fails_loudly() {
        let err = sample().path_for("testC_kts").unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { ref name } if name == "testC_kts"));
    }

    #[test]
    fn test_order_is_preserved() {
        let registry = Registry::from_paths(["z.kts", "a.kts"]).unwrap();
        let order: Vec<&str> = registry.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(order, vec!["z.kts", "a.kts"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = Registry::from_paths(["a.b", "a_b"]).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateEntry { kind: "test name", .. }));
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let err = Registry::new(vec![
            TestCaseEntry::new("testOne", "a.kts"),
            TestCaseEntry::new("testTwo", "./a.kts"),
        ])
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateEntry { kind: "path", .. }));
    }

    #[test]
    fn test_from_paths_round_trips_through_path_for() {
        let paths = ["a.kts", "sub/b.kts", "simple.customext"];
        let registry = Registry::from_paths(paths).unwrap();
        for path in paths {
            assert_eq!(registry.path_for(&derive_test_name(path)).unwrap(), path);
        }
    }

    #[test]
    fn test_tags() {
        let registry = sample();
        assert!(registry.get("testB_customext").unwrap().has_tag("customext"));
        assert!(!registry.get("testA_kts").unwrap().has_tag("customext"));
    }
}

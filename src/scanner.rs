//! Test-data discovery.
//!
//! [`scan`] validates the root eagerly and returns a lazy [`Scan`]. The walk itself runs on the first call to
//! `next()`, so the filesystem is read fresh for every scan: test data may change between manifest generation
//! and verification, and a cached listing would hide exactly that.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;

use suitesync_core::normalize_relative_path;
use walkdir::WalkDir;

use crate::config::{DirectoryMode, TestDataRoot};
use crate::errors::{ManifestError, ManifestResult};

/// Scan a test-data root for matching entries.
///
/// ## Errors
/// - `Configuration` if the root is missing or is not a directory. A missing root is never an empty scan.
pub fn scan(root: &TestDataRoot) -> ManifestResult<Scan<'_>> {
    root.ensure_directory()?;
    Ok(Scan { root, pending: None })
}

/// Collect a scan into a sorted list of relative paths, stopping at the first error.
pub fn scan_to_vec(root: &TestDataRoot) -> ManifestResult<Vec<String>> {
    scan(root)?.collect()
}

/// Lexicographically ordered relative paths under a [`TestDataRoot`].
#[derive(Debug)]
pub struct Scan<'a> {
    root: &'a TestDataRoot,
    pending: Option<vec::IntoIter<ManifestResult<String>>>,
}

impl Iterator for Scan<'_> {
    type Item = ManifestResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let root = self.root;
        self.pending.get_or_insert_with(|| walk(root).into_iter()).next()
    }
}

#[tracing::instrument(skip_all, fields(root = %root.absolute_path().display(), recursive = root.is_recursive()))]
fn walk(root: &TestDataRoot) -> Vec<ManifestResult<String>> {
    match collect_entries(root) {
        Ok(mut found) => {
            found.sort();
            tracing::debug!(count = found.len(), "scan complete");
            found.into_iter().map(Ok).collect()
        }
        // A partial listing would be reported as drift, so the scan stops at the first error.
        Err(err) => vec![Err(err)],
    }
}

fn collect_entries(root: &TestDataRoot) -> ManifestResult<Vec<String>> {
    let base = root.absolute_path();
    let mut found = Vec::new();

    let mut walker = WalkDir::new(base)
        .min_depth(1)
        .max_depth(if root.is_recursive() { usize::MAX } else { 1 })
        .follow_links(true)
        .into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(e) => {
                if let Some(link) = dangling_link(&e) {
                    tracing::debug!(path = %link.display(), "dangling symlink listed as a file");
                    if root.matcher().matches(&file_name(&link)) {
                        found.push(relative_to(base, &link)?);
                    }
                    continue;
                }
                let path = e.path().unwrap_or(base).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                return Err(ManifestError::Io { path, source });
            }
        };

        // Non UTF-8 names are listed lossily so they still show up as drift.
        let name = file_name(entry.path());

        if entry.file_type().is_dir() {
            if root.is_excluded(&name) {
                walker.skip_current_dir();
                continue;
            }
            if root.directory_mode() == DirectoryMode::Units && root.matcher().matches(&name) {
                found.push(relative_to(base, entry.path())?);
                walker.skip_current_dir();
            }
            continue;
        }

        if root.matcher().matches(&name) {
            found.push(relative_to(base, entry.path())?);
        }
    }

    Ok(found)
}

/// A symlink whose target is gone is still a directory entry; walkdir reports it as a `NotFound` error.
fn dangling_link(err: &walkdir::Error) -> Option<PathBuf> {
    if err.io_error()?.kind() != io::ErrorKind::NotFound {
        return None;
    }
    let path = err.path()?;
    let meta = fs::symlink_metadata(path).ok()?;
    meta.file_type().is_symlink().then(|| path.to_path_buf())
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn relative_to(base: &Path, path: &Path) -> ManifestResult<String> {
    let relative = path.strip_prefix(base).map_err(|_| ManifestError::Io {
        path: path.to_path_buf(),
        source: io::Error::other(format!("entry is outside the test data root {}", base.display())),
    })?;
    Ok(normalize_relative_path(&relative.to_string_lossy()))
}

//! File-name matching for test-data discovery.
//!
//! Matchers only ever see a single file name (no directory components). The scanner filters
//! directories out before asking, so a pattern that accepts the empty string cannot select a
//! directory by accident.

use std::fmt;

use regex::Regex;

use crate::errors::{ManifestError, ManifestResult};

/// Decide whether a file belongs to the test set.
pub trait PathMatcher: fmt::Debug + Send + Sync {
    /// Return `true` when `file_name` is part of the test set.
    fn matches(&self, file_name: &str) -> bool;

    /// Human-readable form of the pattern, used in logs and reports.
    fn describe(&self) -> String;
}

/// Accept every file.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl PathMatcher for MatchAll {
    fn matches(&self, _file_name: &str) -> bool {
        true
    }

    fn describe(&self) -> String {
        "^(.*)$".to_string()
    }
}

/// Accept file names matched in full by a regular expression.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    source: String,
    regex: Regex,
}

impl RegexMatcher {
    /// Compile `pattern`, anchored to the whole file name.
    pub fn new(pattern: &str) -> ManifestResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| ManifestError::configuration(format!("invalid file pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }
}

impl PathMatcher for RegexMatcher {
    fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    fn describe(&self) -> String {
        self.source.clone()
    }
}

/// Spellings of "match everything" produced by manifest generators.
const MATCH_ALL_PATTERNS: &[&str] = &[".*", "(.*)", "^(.*)$", "^.*$"];

/// Build the matcher for a manifest pattern.
///
/// Catch-all patterns short-circuit to [`MatchAll`]; anything else is compiled as a [`RegexMatcher`].
pub fn matcher_for_pattern(pattern: &str) -> ManifestResult<Box<dyn PathMatcher>> {
    if MATCH_ALL_PATTERNS.contains(&pattern) {
        return Ok(Box::new(MatchAll));
    }
    Ok(Box::new(RegexMatcher::new(pattern)?))
}

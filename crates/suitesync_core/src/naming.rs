//! Derive test-case names from fixture paths.
//!
//! ## Notes
//! - Names are pure functions of the normalized relative path, so regenerating a manifest from an unchanged tree
//!   yields byte-identical names.
//! - Every character that cannot appear in an identifier becomes `_`. Two distinct paths can therefore map to the
//!   same name (`a.b` and `a_b`); registries reject such collisions instead of silently renaming.

/// Prefix carried by every generated test name.
pub const TEST_NAME_PREFIX: &str = "test";

/// Prefix of the synthetic "all files present" case.
pub const COMPLETENESS_CASE_PREFIX: &str = "testAllFilesPresentIn";

/// Normalize a relative fixture path to its canonical `/`-separated form.
///
/// ## Parameters
/// - `path`: a path relative to the test-data root, using `/` or `\` as separator.
///
/// ## Returns
/// - (`String`): the path with empty and `.` segments dropped, joined with `/`.
///
/// ## Examples
/// ```rust
/// use suitesync_core::normalize_relative_path;
/// assert_eq!(normalize_relative_path("./sub\\a.kts"), "sub/a.kts");
/// assert_eq!(normalize_relative_path("sub//b.kts/"), "sub/b.kts");
/// ```
pub fn normalize_relative_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive the test name for a fixture path.
///
/// ## Parameters
/// - `relative_path`: the fixture path relative to the test-data root.
///
/// ## Returns
/// - (`String`): `test` followed by the escaped path with its first character upper-cased.
///
/// ## Examples
/// ```rust
/// use suitesync_core::derive_test_name;
/// assert_eq!(derive_test_name("simple.customext"), "testSimple_customext");
/// assert_eq!(derive_test_name("pathPattern5.kts"), "testPathPattern5_kts");
/// assert_eq!(derive_test_name("nested/a.kts"), "testNested_a_kts");
/// ```
pub fn derive_test_name(relative_path: &str) -> String {
    let normalized = normalize_relative_path(relative_path);
    format!("{}{}", TEST_NAME_PREFIX, capitalize(&escape_identifier(&normalized)))
}

/// Derive the name of the synthetic completeness case for a test-data directory.
///
/// ## Examples
/// ```rust
/// use suitesync_core::completeness_case_name;
/// assert_eq!(completeness_case_name("customScript"), "testAllFilesPresentInCustomScript");
/// ```
pub fn completeness_case_name(directory_name: &str) -> String {
    format!("{}{}", COMPLETENESS_CASE_PREFIX, capitalize(&escape_identifier(directory_name)))
}

/// Check whether a string has the shape of a generated test name.
///
/// ## Returns
/// - (`bool`): `true` when the name starts with `test`, has at least one more character, and contains only
///   identifier characters.
pub fn is_test_name(name: &str) -> bool {
    name.len() > TEST_NAME_PREFIX.len()
        && name.starts_with(TEST_NAME_PREFIX)
        && name.chars().all(is_identifier_char)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn escape_identifier(raw: &str) -> String {
    raw.chars().map(|c| if is_identifier_char(c) { c } else { '_' }).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Provide the canonical test-case naming vocabulary shared by suitesync and manifest generators.
//!
//! A manifest is produced offline by a generator and consumed at test time by the suite runner. Both sides must agree
//! on how a fixture path turns into a test name, otherwise a freshly generated manifest would already look drifted.
//! This crate holds that agreement.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, no dependencies.
//! - Relative paths are always `/`-separated; see [`naming::normalize_relative_path`].

pub mod naming;

pub use naming::{completeness_case_name, derive_test_name, is_test_name, normalize_relative_path};

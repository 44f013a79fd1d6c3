//! # Core Type Definitions
//!
//! This module contains the data model shared by the loader and the filter:
//! - Candidate matrix rows (`MatrixEntry`, `CandidateMatrix`)
//! - Plugin metadata (`PluginMetadata`, `SupportedRange`)
//! - Release feed rows (`ReleaseFeedEntry`)
//! - Caller supplied overrides (`FilterOverrides`)
//! - Error types (`MatrixError`)
//!
//! Nothing here is mutated once the filter starts.

use crate::primitives::{BRANCH_FIELD, PHP_FIELD};
use crate::version::NumericVersion;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// MATRIX ENTRY
// =============================================================================

/// One row of the CI test matrix.
///
/// Fields are kept with their original scalar types and key order so the
/// filtered matrix serializes back exactly as it was declared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatrixEntry(pub Map<String, Value>);

impl MatrixEntry {
    /// Create an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a field, builder style.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The raw branch label, or `""` when the row has none.
    #[must_use]
    pub fn branch(&self) -> &str {
        self.0
            .get(BRANCH_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The PHP version declared by the row, if it parses as a number.
    #[must_use]
    pub fn php(&self) -> Option<NumericVersion> {
        self.0.get(PHP_FIELD).and_then(NumericVersion::from_json)
    }

    /// Look up any other field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// The full candidate matrix, as declared in the matrix includes file.
///
/// Rows may be null placeholders; they are kept so positions line up with
/// the source document and skipped by the filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateMatrix {
    /// Ordered candidate rows.
    #[serde(default)]
    pub include: Vec<Option<MatrixEntry>>,
}

impl CandidateMatrix {
    /// Wrap a list of rows.
    #[must_use]
    pub fn new(include: Vec<Option<MatrixEntry>>) -> Self {
        Self { include }
    }
}

// =============================================================================
// PLUGIN METADATA
// =============================================================================

/// Inclusive range of numbered branches a plugin declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedRange {
    /// Lowest supported branch number, e.g. `35`.
    pub lower: u32,
    /// Highest supported branch number, e.g. `401`.
    pub upper: u32,
}

impl SupportedRange {
    #[must_use]
    pub const fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    /// Whether `branch` lies within the range, bounds included.
    #[must_use]
    pub const fn contains(&self, branch: u32) -> bool {
        self.lower <= branch && branch <= self.upper
    }
}

/// What a plugin declares about itself.
///
/// When both `supported` and `requires` are present, `supported` decides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Frankenstyle component name, e.g. `local_example`.
    pub component: Option<String>,
    /// Declared branch range.
    pub supported: Option<SupportedRange>,
    /// Lowest core version the plugin runs on.
    pub requires: Option<NumericVersion>,
}

// =============================================================================
// RELEASE FEED
// =============================================================================

/// A known core release: the branch it belongs to and its version number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFeedEntry {
    /// Dotted branch, e.g. `3.9`.
    pub branch: String,
    /// Core version number, e.g. `2020061500`.
    pub version: NumericVersion,
}

impl ReleaseFeedEntry {
    #[must_use]
    pub fn new(branch: impl Into<String>, version: NumericVersion) -> Self {
        Self {
            branch: branch.into(),
            version,
        }
    }
}

// =============================================================================
// OVERRIDES
// =============================================================================

/// Caller supplied adjustments to the filter.
///
/// The binary builds this from the step's environment; the filter itself
/// never looks at process state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOverrides {
    /// Rows whose PHP version is below this are dropped.
    pub min_php: Option<NumericVersion>,
    /// When non-empty, only rows with one of these raw branch labels survive.
    pub branch_filter: BTreeSet<String>,
    /// Drop the development branch.
    pub disable_main: bool,
}

impl FilterOverrides {
    /// Build an explicit branch filter from whitespace separated labels.
    #[must_use]
    pub fn parse_branch_filter(raw: &str) -> BTreeSet<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while preparing a matrix.
///
/// The filter itself never fails; these come from parsing and loading.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// The plugin metadata file does not exist.
    #[error("Plugin metadata not found: {}", .0.display())]
    MissingMetadata(PathBuf),

    /// The plugin metadata could not be read.
    #[error("Invalid plugin metadata: {0}")]
    MetadataParse(String),

    /// The candidate matrix could not be parsed.
    #[error("Invalid matrix: {0}")]
    MatrixParse(String),

    /// The release feed could not be parsed.
    #[error("Invalid release feed: {0}")]
    FeedParse(String),

    /// The release feed could not be fetched.
    #[error("Release feed unavailable: {0}")]
    FeedUnavailable(String),

    /// A value that should be a decimal number is not one.
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    /// The settings file or command line is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

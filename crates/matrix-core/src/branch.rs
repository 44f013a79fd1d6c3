//! # Branch Normalizer
//!
//! Turns branch labels into comparable identifiers and back.
//!
//! - `MOODLE_39_STABLE` normalizes to branch `39`
//! - `main` (and anything else the pattern misses) passes through unchanged
//! - Feed branch `3.9` maps back to the label `MOODLE_39_STABLE`

use crate::primitives::{BRANCH_PATTERN, BRANCH_PREFIX, BRANCH_SUFFIX, MAIN_BRANCH};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

static STABLE_BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(BRANCH_PATTERN).expect("BRANCH_PATTERN is a valid regex"));

/// A branch label reduced to something the filter can compare.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormalizedBranch {
    /// A numbered stable branch, e.g. `39` or `310`.
    Numbered(u32),
    /// Anything without a branch number: the development branch, or a label
    /// that does not follow the stable pattern.
    Other(String),
}

impl NormalizedBranch {
    /// Normalize a raw label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let extracted = extract_branch_id(label);
        match extracted.parse::<u32>() {
            Ok(n) if extracted.bytes().all(|b| b.is_ascii_digit()) => Self::Numbered(n),
            _ => Self::Other(extracted.into_owned()),
        }
    }

    /// The branch number, if there is one.
    #[must_use]
    pub const fn number(&self) -> Option<u32> {
        match self {
            Self::Numbered(n) => Some(*n),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for NormalizedBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "{n}"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Replace the stable-branch pattern in `label` with its captured number.
///
/// Labels the pattern does not match come back untouched.
#[must_use]
pub fn extract_branch_id(label: &str) -> Cow<'_, str> {
    STABLE_BRANCH.replace(label, "$1")
}

/// Build the stable label for a dotted feed branch: `3.9` -> `MOODLE_39_STABLE`.
#[must_use]
pub fn stable_label_for(feed_branch: &str) -> String {
    format!(
        "{BRANCH_PREFIX}{}{BRANCH_SUFFIX}",
        feed_branch.replace('.', "")
    )
}

/// Whether `label` is the development branch sentinel.
#[must_use]
pub fn is_main_branch(label: &str) -> bool {
    label == MAIN_BRANCH
}

// =============================================================================
// TESTS
// =============================================================================

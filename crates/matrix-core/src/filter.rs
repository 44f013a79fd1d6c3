//! # Matrix Filter
//!
//! Decides which candidate rows a plugin is tested against.
//!
//! The filter runs in two passes. The first collects every numbered branch
//! present in the candidate matrix; the second decides each row on its own,
//! consulting that set only to tell whether an open-ended supported range
//! should reach the development branch.
//!
//! ## Rules
//!
//! Evaluated in order; the first rule that applies decides.
//!
//! 1. Null rows are dropped.
//! 2. Rows on a PHP version below `min_php` are dropped, as are rows
//!    with no PHP version once a minimum is set.
//! 3. An explicit branch filter keeps exactly the listed labels.
//! 4. `main` is dropped when disabled.
//! 5. A supported range keeps rows inside it, and keeps `main` when the
//!    upper bound names no branch in the matrix.
//! 6. A required version keeps rows whose release meets it.
//! 7. Everything else is dropped.

use crate::branch::{NormalizedBranch, is_main_branch, stable_label_for};
use crate::types::{FilterOverrides, MatrixEntry, PluginMetadata, ReleaseFeedEntry};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// DECISIONS
// =============================================================================

/// Why a row was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The row is a null placeholder.
    NullEntry,
    /// The row's PHP version is below the configured minimum.
    BelowMinimumPhp,
    /// An explicit branch filter is active.
    ExplicitFilter,
    /// The row is `main` and `main` is disabled.
    MainDisabled,
    /// The row's branch is inside the supported range.
    WithinSupportedRange,
    /// The row is `main` and the range's upper bound is not a known branch.
    MainImpliedByOpenRange,
    /// The row's branch is outside the supported range.
    OutsideSupportedRange,
    /// A release on the row's branch meets the required version.
    MeetsRequiredVersion,
    /// Releases on the row's branch are all older than the required version.
    BelowRequiredVersion,
    /// No release in the feed belongs to the row's branch.
    NoMatchingRelease,
    /// The plugin declares neither a range nor a required version.
    NoApplicableRule,
}

impl Reason {
    /// Stable snake_case name, used in logs and `explain` output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullEntry => "null_entry",
            Self::BelowMinimumPhp => "below_minimum_php",
            Self::ExplicitFilter => "explicit_filter",
            Self::MainDisabled => "main_disabled",
            Self::WithinSupportedRange => "within_supported_range",
            Self::MainImpliedByOpenRange => "main_implied_by_open_range",
            Self::OutsideSupportedRange => "outside_supported_range",
            Self::MeetsRequiredVersion => "meets_required_version",
            Self::BelowRequiredVersion => "below_required_version",
            Self::NoMatchingRelease => "no_matching_release",
            Self::NoApplicableRule => "no_applicable_rule",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Include(Reason),
    Exclude(Reason),
}

impl Decision {
    #[must_use]
    pub const fn is_included(self) -> bool {
        matches!(self, Self::Include(_))
    }

    #[must_use]
    pub const fn reason(self) -> Reason {
        match self {
            Self::Include(r) | Self::Exclude(r) => r,
        }
    }
}

/// A row together with the decision taken on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'m> {
    /// Position of the row in the candidate matrix.
    pub index: usize,
    /// The row, or `None` for a null placeholder.
    pub entry: Option<&'m MatrixEntry>,
    pub decision: Decision,
}

// =============================================================================
// KNOWN BRANCHES (first pass)
// =============================================================================

/// Every numbered branch that appears somewhere in the candidate matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownBranches(BTreeSet<u32>);

impl KnownBranches {
    /// Scan the whole matrix, skipping null rows.
    #[must_use]
    pub fn scan(matrix: &[Option<MatrixEntry>]) -> Self {
        Self(
            matrix
                .iter()
                .flatten()
                .filter_map(|entry| NormalizedBranch::from_label(entry.branch()).number())
                .collect(),
        )
    }

    #[must_use]
    pub fn contains(&self, branch: u32) -> bool {
        self.0.contains(&branch)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// FILTER
// =============================================================================

/// The matrix filter, bound to one plugin's metadata and overrides.
///
/// Holds no state between calls: the same matrix always yields the same
/// result.
#[derive(Debug, Clone, Copy)]
pub struct MatrixFilter<'a> {
    metadata: &'a PluginMetadata,
    overrides: &'a FilterOverrides,
    releases: &'a [ReleaseFeedEntry],
}

impl<'a> MatrixFilter<'a> {
    #[must_use]
    pub const fn new(
        metadata: &'a PluginMetadata,
        overrides: &'a FilterOverrides,
        releases: &'a [ReleaseFeedEntry],
    ) -> Self {
        Self {
            metadata,
            overrides,
            releases,
        }
    }

    /// Whether the release feed can influence any decision.
    ///
    /// Only the required-version rule reads it, and that rule is shadowed
    /// by a supported range.
    #[must_use]
    pub const fn needs_release_feed(metadata: &PluginMetadata) -> bool {
        metadata.supported.is_none() && metadata.requires.is_some()
    }

    /// Decide a single row.
    #[must_use]
    pub fn decide(&self, entry: Option<&MatrixEntry>, known: &KnownBranches) -> Decision {
        let Some(entry) = entry else {
            return Decision::Exclude(Reason::NullEntry);
        };

        let label = entry.branch();
        let branch = NormalizedBranch::from_label(label);

        // A row without a readable PHP version ranks below any minimum.
        if let Some(min_php) = &self.overrides.min_php {
            if entry.php().is_none_or(|php| php < *min_php) {
                return Decision::Exclude(Reason::BelowMinimumPhp);
            }
        }

        if !self.overrides.branch_filter.is_empty() {
            return if self.overrides.branch_filter.contains(label) {
                Decision::Include(Reason::ExplicitFilter)
            } else {
                Decision::Exclude(Reason::ExplicitFilter)
            };
        }

        if is_main_branch(label) && self.overrides.disable_main {
            return Decision::Exclude(Reason::MainDisabled);
        }

        if let Some(range) = self.metadata.supported {
            if branch.number().is_some_and(|n| range.contains(n)) {
                return Decision::Include(Reason::WithinSupportedRange);
            }
            if is_main_branch(label) && !known.contains(range.upper) {
                return Decision::Include(Reason::MainImpliedByOpenRange);
            }
            return Decision::Exclude(Reason::OutsideSupportedRange);
        }

        if let Some(requires) = &self.metadata.requires {
            let mut on_branch = self
                .releases
                .iter()
                .filter(|release| stable_label_for(&release.branch) == label)
                .peekable();
            if on_branch.peek().is_none() {
                return Decision::Exclude(Reason::NoMatchingRelease);
            }
            return if on_branch.any(|release| release.version >= *requires) {
                Decision::Include(Reason::MeetsRequiredVersion)
            } else {
                Decision::Exclude(Reason::BelowRequiredVersion)
            };
        }

        Decision::Exclude(Reason::NoApplicableRule)
    }

    /// Decide every row, in matrix order.
    #[must_use]
    pub fn evaluate<'m>(&self, matrix: &'m [Option<MatrixEntry>]) -> Vec<Evaluation<'m>> {
        let known = KnownBranches::scan(matrix);
        matrix
            .iter()
            .enumerate()
            .map(|(index, entry)| Evaluation {
                index,
                entry: entry.as_ref(),
                decision: self.decide(entry.as_ref(), &known),
            })
            .collect()
    }

    /// The kept rows, in matrix order.
    #[must_use]
    pub fn filter(&self, matrix: &[Option<MatrixEntry>]) -> Vec<MatrixEntry> {
        self.evaluate(matrix)
            .into_iter()
            .filter(|evaluation| evaluation.decision.is_included())
            .filter_map(|evaluation| evaluation.entry.cloned())
            .collect()
    }
}

/// Filter `matrix` for a plugin in one call.
#[must_use]
pub fn filter_matrix(
    matrix: &[Option<MatrixEntry>],
    metadata: &PluginMetadata,
    overrides: &FilterOverrides,
    releases: &[ReleaseFeedEntry],
) -> Vec<MatrixEntry> {
    MatrixFilter::new(metadata, overrides, releases).filter(matrix)
}

// =============================================================================
// TESTS
// =============================================================================

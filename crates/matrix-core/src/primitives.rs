//! # Fixed Primitives
//!
//! Constants the filter is compiled with. They describe the shape of the
//! host platform's branch labels, the candidate matrix fields the filter
//! reads, and the names of the values it emits.

// =============================================================================
// BRANCH LABELS
// =============================================================================

/// Prefix of a numbered stable branch label (`MOODLE_39_STABLE`).
pub const BRANCH_PREFIX: &str = "MOODLE_";

/// Suffix of a numbered stable branch label.
pub const BRANCH_SUFFIX: &str = "_STABLE";

/// Pattern that captures the branch number out of a stable branch label.
///
/// Everything outside the match is kept when the label is normalized.
pub const BRANCH_PATTERN: &str = r"MOODLE_(.*)_STABLE";

/// Sentinel label of the development branch.
pub const MAIN_BRANCH: &str = "main";

// =============================================================================
// MATRIX FIELDS
// =============================================================================

/// Matrix entry field holding the branch label.
pub const BRANCH_FIELD: &str = "moodle-branch";

/// Matrix entry field holding the PHP version the row runs on.
pub const PHP_FIELD: &str = "php";

// =============================================================================
// OUTPUT NAMES
// =============================================================================

/// Output carrying the filtered matrix as JSON.
pub const OUTPUT_MATRIX: &str = "matrix";

/// Output carrying the plugin component name.
pub const OUTPUT_COMPONENT: &str = "component";

/// Output carrying the branch of the first filtered entry.
pub const OUTPUT_HIGHEST_BRANCH: &str = "highest_moodle_branch";

// =============================================================================
// RELEASE FEED
// =============================================================================

/// Version-history endpoint listing every core release since a given branch.
pub const RELEASE_FEED_ENDPOINT: &str = "https://download.moodle.org/api/1.3/updates.php";

/// Oldest branch the release feed is asked about.
pub const DEFAULT_LOWEST_BRANCH: &str = "3.8";

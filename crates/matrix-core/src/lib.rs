//! # matrix-core
//!
//! The deterministic Matrix Filter for plugin CI builds - THE LOGIC.
//!
//! Given what a plugin declares about itself (`version.php`), the full list
//! of candidate CI rows, and the known core releases, this crate decides
//! which rows the plugin is tested against and assembles the values the
//! CI step publishes.
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no filesystem: the binary loads inputs and
//!   writes outputs
//! - Overrides arrive as a `FilterOverrides` value, never from the
//!   environment
//! - No floats: versions compare as exact decimals
//! - The filter never fails; only parsing does

// =============================================================================
// MODULES
// =============================================================================

pub mod branch;
pub mod feed;
pub mod filter;
pub mod metadata;
pub mod output;
pub mod primitives;
pub mod types;
pub mod version;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    CandidateMatrix, FilterOverrides, MatrixEntry, MatrixError, PluginMetadata, ReleaseFeedEntry,
    SupportedRange,
};
pub use version::NumericVersion;

// =============================================================================
// RE-EXPORTS: Filter
// =============================================================================

pub use branch::{NormalizedBranch, extract_branch_id, is_main_branch, stable_label_for};
pub use filter::{Decision, Evaluation, KnownBranches, MatrixFilter, Reason, filter_matrix};

// =============================================================================
// RE-EXPORTS: Inputs & Outputs
// =============================================================================

pub use feed::{default_release_feed_url, parse_release_feed, release_feed_url};
pub use metadata::parse_version_file;
pub use output::{MatrixOutputs, format_output_line};

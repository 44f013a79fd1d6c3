//! # Configuration
//!
//! Where a run reads its inputs from and writes its outputs to, plus the
//! filter overrides a workflow passes in through the environment.
//!
//! ## Precedence
//!
//! Command line flag > environment (`GITHUB_WORKSPACE`, `GITHUB_OUTPUT`) >
//! settings file (`--config plugin-matrix.toml`) > built-in default.
//!
//! ## Overrides
//!
//! - `min_php` - drop rows on an older PHP
//! - `filter` - whitespace separated branch labels to run, nothing else
//! - `disable_main` (or the older `disable_master`) - skip the development branch

use matrix_core::{FilterOverrides, MatrixError, NumericVersion, default_release_feed_url};
use matrix_core::primitives::DEFAULT_LOWEST_BRANCH;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// ENVIRONMENT NAMES
// =============================================================================

/// Checkout root of the workflow.
pub const ENV_WORKSPACE: &str = "GITHUB_WORKSPACE";
/// File the step appends its outputs to.
pub const ENV_OUTPUT: &str = "GITHUB_OUTPUT";
/// Minimum PHP version override.
pub const ENV_MIN_PHP: &str = "min_php";
/// Explicit branch filter override.
pub const ENV_FILTER: &str = "filter";
/// Development branch switch.
pub const ENV_DISABLE_MAIN: &str = "disable_main";
/// Development branch switch, pre-rename spelling.
pub const ENV_DISABLE_MASTER: &str = "disable_master";

/// Plugin checkout, relative to the workspace.
pub const DEFAULT_VERSION_FILE: &str = "plugin/version.php";
/// Matrix includes, relative to the workspace.
pub const DEFAULT_MATRIX_FILE: &str = "ci/.github/actions/matrix/matrix_includes.yml";

// =============================================================================
// SETTINGS FILE
// =============================================================================

/// Optional TOML settings file. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub workspace: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub matrix_file: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub lowest_branch: Option<String>,
    pub output: Option<PathBuf>,
}

impl SettingsFile {
    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        toml::from_str(text).map_err(|e| MatrixError::Config(format!("settings file: {e}")))
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Self, MatrixError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MatrixError::Config(format!("cannot read settings file '{}': {e}", path.display()))
        })?;
        Self::parse(&text)
    }
}

// =============================================================================
// RESOLVED SETTINGS
// =============================================================================

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsArgs {
    pub workspace: Option<PathBuf>,
    pub version_file: Option<PathBuf>,
    pub matrix_file: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub feed_file: Option<PathBuf>,
    pub lowest_branch: Option<String>,
    pub output: Option<PathBuf>,
}

/// Where the release feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Fetch over HTTP.
    Url(String),
    /// Read a previously saved response.
    File(PathBuf),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workspace: PathBuf,
    pub version_file: PathBuf,
    pub matrix_file: PathBuf,
    pub feed: FeedSource,
    /// Output file; `None` means outputs are only echoed.
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Combine flags, environment and settings file.
    ///
    /// `env` looks up one environment variable; pass
    /// `|key| std::env::var(key).ok()` outside of tests.
    pub fn resolve<F>(args: &SettingsArgs, file: &SettingsFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let workspace = args
            .workspace
            .clone()
            .or_else(|| non_empty(env(ENV_WORKSPACE)).map(PathBuf::from))
            .or_else(|| file.workspace.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let version_file = args
            .version_file
            .clone()
            .or_else(|| file.version_file.clone())
            .unwrap_or_else(|| workspace.join(DEFAULT_VERSION_FILE));

        let matrix_file = args
            .matrix_file
            .clone()
            .or_else(|| file.matrix_file.clone())
            .unwrap_or_else(|| workspace.join(DEFAULT_MATRIX_FILE));

        let feed = match (&args.feed_file, &args.feed_url) {
            (Some(path), _) => FeedSource::File(path.clone()),
            (None, Some(url)) => FeedSource::Url(url.clone()),
            (None, None) => FeedSource::Url(file.feed_url.clone().unwrap_or_else(|| {
                let lowest = args
                    .lowest_branch
                    .as_deref()
                    .or(file.lowest_branch.as_deref())
                    .unwrap_or(DEFAULT_LOWEST_BRANCH);
                default_release_feed_url(lowest)
            })),
        };

        let output = args
            .output
            .clone()
            .or_else(|| non_empty(env(ENV_OUTPUT)).map(PathBuf::from))
            .or_else(|| file.output.clone());

        Self {
            workspace,
            version_file,
            matrix_file,
            feed,
            output,
        }
    }
}

// =============================================================================
// OVERRIDES
// =============================================================================

/// Read the filter overrides from the environment.
pub fn overrides_from_env<F>(env: F) -> Result<FilterOverrides, MatrixError>
where
    F: Fn(&str) -> Option<String>,
{
    let min_php = non_empty(env(ENV_MIN_PHP))
        .map(|raw| {
            raw.parse::<NumericVersion>()
                .map_err(|_| MatrixError::Config(format!("{ENV_MIN_PHP}={raw:?} is not a version")))
        })
        .transpose()?;

    let branch_filter = env(ENV_FILTER)
        .map(|raw| FilterOverrides::parse_branch_filter(&raw))
        .unwrap_or_default();

    let disable_main = is_truthy(env(ENV_DISABLE_MAIN)) || is_truthy(env(ENV_DISABLE_MASTER));

    Ok(FilterOverrides {
        min_php,
        branch_filter,
        disable_main,
    })
}

/// Workflow inputs arrive as strings; unset, `""` and `"0"` all mean off.
fn is_truthy(value: Option<String>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v != "0")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// TESTS
// =============================================================================

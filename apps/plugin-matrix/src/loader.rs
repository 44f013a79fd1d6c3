//! # Input Loader
//!
//! Reads everything the filter needs before it runs:
//! - plugin metadata from `version.php` (missing file is fatal)
//! - the candidate matrix from the matrix includes YAML
//! - the release feed, only when the metadata makes it matter

use crate::client::ReleaseFeedClient;
use crate::config::{FeedSource, Settings};
use matrix_core::{
    CandidateMatrix, MatrixError, MatrixFilter, PluginMetadata, ReleaseFeedEntry,
    parse_release_feed, parse_version_file,
};
use std::path::Path;

/// Everything a run filters over.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub metadata: PluginMetadata,
    pub matrix: CandidateMatrix,
    pub releases: Vec<ReleaseFeedEntry>,
}

fn read_file(path: &Path) -> Result<String, MatrixError> {
    std::fs::read_to_string(path)
        .map_err(|e| MatrixError::IoError(format!("Cannot read '{}': {e}", path.display())))
}

/// Load plugin metadata. A missing file aborts the run.
pub fn load_metadata(path: &Path) -> Result<PluginMetadata, MatrixError> {
    if !path.is_file() {
        return Err(MatrixError::MissingMetadata(path.to_path_buf()));
    }
    parse_version_file(&read_file(path)?)
}

/// Parse a matrix includes document.
pub fn parse_matrix(text: &str) -> Result<CandidateMatrix, MatrixError> {
    serde_yaml::from_str(text).map_err(|e| MatrixError::MatrixParse(e.to_string()))
}

/// Load the candidate matrix.
pub fn load_matrix(path: &Path) -> Result<CandidateMatrix, MatrixError> {
    parse_matrix(&read_file(path)?)
}

/// Load the release feed from wherever the settings point.
pub async fn load_release_feed(source: &FeedSource) -> Result<Vec<ReleaseFeedEntry>, MatrixError> {
    match source {
        FeedSource::Url(url) => {
            tracing::info!("Fetching release feed from {}", url);
            Ok(ReleaseFeedClient::new(url.as_str()).fetch().await?)
        }
        FeedSource::File(path) => {
            tracing::info!("Reading release feed from {:?}", path);
            parse_release_feed(&read_file(path)?)
        }
    }
}

/// Load all inputs for a run.
pub async fn load_inputs(settings: &Settings) -> Result<Inputs, MatrixError> {
    let metadata = load_metadata(&settings.version_file)?;
    let component = metadata.component.as_deref().unwrap_or_default();
    let requires = metadata.requires.as_ref().map(ToString::to_string);
    tracing::info!(
        component,
        supported = ?metadata.supported,
        requires = ?requires,
        "Loaded plugin metadata from {:?}",
        settings.version_file
    );

    let matrix = load_matrix(&settings.matrix_file)?;
    tracing::info!(
        "Loaded {} candidate rows from {:?}",
        matrix.include.len(),
        settings.matrix_file
    );

    let releases = if MatrixFilter::needs_release_feed(&metadata) {
        let releases = load_release_feed(&settings.feed).await?;
        tracing::info!("Release feed lists {} core releases", releases.len());
        releases
    } else {
        tracing::debug!("Release feed not needed for this plugin");
        Vec::new()
    };

    Ok(Inputs {
        metadata,
        matrix,
        releases,
    })
}

// =============================================================================
// TESTS
// =============================================================================

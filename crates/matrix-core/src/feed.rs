//! # Release Feed
//!
//! Decoding of the core version-history endpoint.
//!
//! The endpoint answers with `{"updates": {"core": [{"branch": "3.9",
//! "version": "2020061500.00", ...}, ...]}}`. Only `branch` and `version`
//! matter here; a response without `updates.core` is an empty feed.

use crate::MatrixError;
use crate::primitives::RELEASE_FEED_ENDPOINT;
use crate::types::ReleaseFeedEntry;
use serde_json::Value;

/// URL of the feed listing every release from `lowest_branch` onwards.
#[must_use]
pub fn release_feed_url(endpoint: &str, lowest_branch: &str) -> String {
    format!("{endpoint}?format=json&version=0.0&branch={lowest_branch}")
}

/// URL of the public feed for `lowest_branch`.
#[must_use]
pub fn default_release_feed_url(lowest_branch: &str) -> String {
    release_feed_url(RELEASE_FEED_ENDPOINT, lowest_branch)
}

/// Decode a feed response body.
pub fn parse_release_feed(body: &str) -> Result<Vec<ReleaseFeedEntry>, MatrixError> {
    let document: Value =
        serde_json::from_str(body).map_err(|e| MatrixError::FeedParse(e.to_string()))?;
    releases_from_value(&document)
}

/// Pull the core releases out of an already decoded response.
pub fn releases_from_value(document: &Value) -> Result<Vec<ReleaseFeedEntry>, MatrixError> {
    match document.get("updates").and_then(|u| u.get("core")) {
        Some(core) if core.is_array() => serde_json::from_value(core.clone())
            .map_err(|e| MatrixError::FeedParse(format!("updates.core: {e}"))),
        _ => Ok(Vec::new()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

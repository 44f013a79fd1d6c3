//! # Output Assembly
//!
//! Builds the three values a run publishes and formats them as the
//! `name=value` lines the step's output file expects.
//!
//! Assembly only. Writing the lines somewhere is the binary's job.

use crate::MatrixError;
use crate::primitives::{OUTPUT_COMPONENT, OUTPUT_HIGHEST_BRANCH, OUTPUT_MATRIX};
use crate::types::{MatrixEntry, PluginMetadata};
use serde::Serialize;

#[derive(Serialize)]
struct FilteredMatrix<'a> {
    include: &'a [MatrixEntry],
}

/// The values published by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixOutputs {
    /// `{"include":[...]}`, compact, slashes unescaped.
    pub matrix: String,
    /// Plugin component, or `""` if the metadata does not name one.
    pub component: String,
    /// Branch label of the first kept row, or `""` if nothing was kept.
    pub highest_branch: String,
}

impl MatrixOutputs {
    /// Assemble the outputs for a filtered matrix.
    pub fn assemble(
        filtered: &[MatrixEntry],
        metadata: &PluginMetadata,
    ) -> Result<Self, MatrixError> {
        let matrix = serde_json::to_string(&FilteredMatrix { include: filtered })
            .map_err(|e| MatrixError::SerializationError(e.to_string()))?;

        Ok(Self {
            matrix,
            component: metadata.component.clone().unwrap_or_default(),
            highest_branch: filtered
                .first()
                .map(|entry| entry.branch().to_string())
                .unwrap_or_default(),
        })
    }

    /// Named values, in publication order.
    #[must_use]
    pub fn named(&self) -> [(&'static str, &str); 3] {
        [
            (OUTPUT_MATRIX, self.matrix.as_str()),
            (OUTPUT_COMPONENT, self.component.as_str()),
            (OUTPUT_HIGHEST_BRANCH, self.highest_branch.as_str()),
        ]
    }
}

/// One output line, newline terminated.
#[must_use]
pub fn format_output_line(name: &str, value: &str) -> String {
    format!("{name}={value}\n")
}

// =============================================================================
// TESTS
// =============================================================================

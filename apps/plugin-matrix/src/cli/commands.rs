//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::Settings;
use crate::emitter::OutputEmitter;
use crate::loader::{Inputs, load_inputs};
use matrix_core::{FilterOverrides, MatrixError, MatrixFilter, MatrixOutputs};
use serde::Serialize;

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Filter the matrix and publish the outputs.
///
/// Returns the published values.
pub async fn cmd_run(
    settings: &Settings,
    overrides: &FilterOverrides,
    echo: bool,
) -> Result<MatrixOutputs, MatrixError> {
    let inputs = load_inputs(settings).await?;
    let outputs = prepare_outputs(&inputs, overrides)?;

    OutputEmitter::new(settings.output.clone(), echo).emit_all(&outputs);
    Ok(outputs)
}

/// Filter loaded inputs and assemble the outputs.
pub fn prepare_outputs(
    inputs: &Inputs,
    overrides: &FilterOverrides,
) -> Result<MatrixOutputs, MatrixError> {
    let filter = MatrixFilter::new(&inputs.metadata, overrides, &inputs.releases);
    let evaluations = filter.evaluate(&inputs.matrix.include);

    for evaluation in &evaluations {
        tracing::debug!(
            index = evaluation.index,
            branch = evaluation.entry.map(|e| e.branch()).unwrap_or_default(),
            included = evaluation.decision.is_included(),
            reason = %evaluation.decision.reason(),
            "Matrix decision"
        );
    }

    let kept: Vec<_> = evaluations
        .iter()
        .filter(|evaluation| evaluation.decision.is_included())
        .filter_map(|evaluation| evaluation.entry.cloned())
        .collect();
    tracing::info!(
        "Kept {} of {} candidate rows",
        kept.len(),
        inputs.matrix.include.len()
    );

    MatrixOutputs::assemble(&kept, &inputs.metadata)
}

// =============================================================================
// EXPLAIN COMMAND
// =============================================================================

/// One line of `explain` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainRow {
    pub index: usize,
    pub branch: Option<String>,
    pub php: Option<String>,
    pub included: bool,
    pub reason: &'static str,
}

/// The decision on every candidate row, in matrix order.
pub fn explain_rows(inputs: &Inputs, overrides: &FilterOverrides) -> Vec<ExplainRow> {
    MatrixFilter::new(&inputs.metadata, overrides, &inputs.releases)
        .evaluate(&inputs.matrix.include)
        .into_iter()
        .map(|evaluation| ExplainRow {
            index: evaluation.index,
            branch: evaluation.entry.map(|e| e.branch().to_string()),
            php: evaluation
                .entry
                .and_then(|e| e.php())
                .map(|php| php.to_string()),
            included: evaluation.decision.is_included(),
            reason: evaluation.decision.reason().as_str(),
        })
        .collect()
}

/// Show the decision taken on every candidate row.
pub async fn cmd_explain(
    settings: &Settings,
    overrides: &FilterOverrides,
    json_mode: bool,
) -> Result<(), MatrixError> {
    let inputs = load_inputs(settings).await?;
    let rows = explain_rows(&inputs, overrides);

    if json_mode {
        let output = serde_json::json!({
            "component": inputs.metadata.component,
            "rows": rows,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| MatrixError::SerializationError(e.to_string()))?
        );
        return Ok(());
    }

    println!(
        "Component: {}",
        inputs.metadata.component.as_deref().unwrap_or("(none)")
    );
    println!();
    println!("  {:>3}  {:<8} {:<22} {:<6} Reason", "#", "Decision", "Branch", "PHP");
    for row in &rows {
        println!(
            "  {:>3}  {:<8} {:<22} {:<6} {}",
            row.index,
            if row.included { "include" } else { "exclude" },
            row.branch.as_deref().unwrap_or("(null)"),
            row.php.as_deref().unwrap_or("-"),
            row.reason
        );
    }
    Ok(())
}

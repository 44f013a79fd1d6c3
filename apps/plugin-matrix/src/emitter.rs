//! # Output Emitter
//!
//! Appends `name=value` lines to the step's output file.
//!
//! Without an output file the lines are skipped; the values are still
//! echoed to stdout so a local run shows what would have been published.

use matrix_core::{MatrixError, MatrixOutputs, format_output_line};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes outputs to an append-only sink.
#[derive(Debug, Clone)]
pub struct OutputEmitter {
    sink: Option<PathBuf>,
    echo: bool,
}

impl OutputEmitter {
    /// Create an emitter. `echo` prints a notice per value to stdout.
    pub fn new(sink: Option<PathBuf>, echo: bool) -> Self {
        Self { sink, echo }
    }

    pub fn sink(&self) -> Option<&Path> {
        self.sink.as_deref()
    }

    /// Publish one value.
    ///
    /// A sink that cannot be opened or written is skipped with a warning;
    /// the notice is printed either way.
    pub fn emit(&self, name: &str, value: &str) -> Emitted {
        let emitted = match &self.sink {
            Some(path) => match append_line(path, name, value) {
                Ok(()) => Emitted::Written,
                Err(e) => {
                    tracing::warn!("Skipping output {}: {}", name, e);
                    Emitted::Skipped
                }
            },
            None => {
                tracing::debug!("No output file configured, not writing {}", name);
                Emitted::Skipped
            }
        };

        if self.echo {
            println!("Setting output.. {} = {}", name, value);
        }
        emitted
    }

    /// Publish every value of a run, in order.
    pub fn emit_all(&self, outputs: &MatrixOutputs) -> Vec<(&'static str, Emitted)> {
        outputs
            .named()
            .into_iter()
            .map(|(name, value)| (name, self.emit(name, value)))
            .collect()
    }
}

/// What happened to one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitted {
    /// Appended to the sink.
    Written,
    /// No sink, or the sink was unavailable.
    Skipped,
}

fn append_line(path: &Path, name: &str, value: &str) -> Result<(), MatrixError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MatrixError::IoError(format!("Cannot open output '{}': {e}", path.display())))?;
    file.write_all(format_output_line(name, value).as_bytes())
        .map_err(|e| MatrixError::IoError(format!("Cannot write output '{}': {e}", path.display())))
}

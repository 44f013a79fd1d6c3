//! # CLI Module
//!
//! Command line interface of the matrix step.
//!
//! ## Available Commands
//!
//! - `run` - Filter the matrix and publish the outputs (default)
//! - `explain` - Show the decision taken on every candidate row

mod commands;

use crate::config::{Settings, SettingsArgs, SettingsFile, overrides_from_env};
use clap::{Parser, Subcommand};
use matrix_core::MatrixError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Plugin Matrix - decide which host branches a plugin is tested against.
///
/// Reads the plugin's version.php, the candidate matrix and (when needed)
/// the core release feed, and publishes the filtered matrix.
#[derive(Parser, Debug)]
#[command(name = "plugin-matrix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner and output notices
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Workflow checkout root (defaults to $GITHUB_WORKSPACE)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Plugin version.php
    #[arg(long, global = true)]
    pub version_file: Option<PathBuf>,

    /// Candidate matrix includes (YAML)
    #[arg(long, global = true)]
    pub matrix_file: Option<PathBuf>,

    /// Release feed URL
    #[arg(long, global = true)]
    pub feed_url: Option<String>,

    /// Read the release feed from a saved JSON response instead
    #[arg(long, global = true, conflicts_with = "feed_url")]
    pub feed_file: Option<PathBuf>,

    /// Oldest branch asked of the release feed
    #[arg(long, global = true)]
    pub lowest_branch: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter the matrix and publish outputs
    Run {
        /// Output file (defaults to $GITHUB_OUTPUT)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the decision taken on every candidate row
    Explain,
}

impl Cli {
    fn settings_args(&self) -> SettingsArgs {
        let output = match &self.command {
            Some(Commands::Run { output }) => output.clone(),
            _ => None,
        };
        SettingsArgs {
            workspace: self.workspace.clone(),
            version_file: self.version_file.clone(),
            matrix_file: self.matrix_file.clone(),
            feed_url: self.feed_url.clone(),
            feed_file: self.feed_file.clone(),
            lowest_branch: self.lowest_branch.clone(),
            output,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MatrixError> {
    let env = |key: &str| std::env::var(key).ok();

    let file = match &cli.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let settings = Settings::resolve(&cli.settings_args(), &file, env);
    let overrides = overrides_from_env(env)?;

    match cli.command {
        Some(Commands::Explain) => cmd_explain(&settings, &overrides, cli.json_mode).await,
        Some(Commands::Run { .. }) | None => {
            cmd_run(&settings, &overrides, !cli.quiet).await.map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_output_flag_feeds_settings() {
        let cli = Cli::parse_from(["plugin-matrix", "-w", "/ws", "run", "--output", "/out"]);
        let args = cli.settings_args();
        assert_eq!(args.workspace, Some(PathBuf::from("/ws")));
        assert_eq!(args.output, Some(PathBuf::from("/out")));
    }

    #[test]
    fn feed_sources_conflict() {
        let result = Cli::try_parse_from([
            "plugin-matrix",
            "--feed-url",
            "http://feed",
            "--feed-file",
            "feed.json",
        ]);
        assert!(result.is_err());
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config;

fn parse_parallel(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|e| format!("{e}"))?;
    config::validate_parallel(v)
}

#[derive(Parser)]
#[command(
    name = "pixdiff",
    about = "Exact pixel comparison for visual regression tests"
)]
pub struct Cli {
    /// Snapshot directory with config.toml and reference/current/difference [default: .pixdiff]
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create config.toml with the default settings
    Init {
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Compare two image files and print the mismatch percentage (exit 0/1)
    Diff {
        /// Reference (baseline) image
        reference: PathBuf,
        /// Current (candidate) image
        current: PathBuf,
        /// Write the diff visualization as PNG
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Print a JSON object instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compare every current/ snapshot with its reference (exit 0/1)
    Check {
        /// Only check snapshots whose name contains PATTERN (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Number of snapshots compared concurrently
        #[arg(long, short = 'p', value_parser = parse_parallel)]
        parallel: Option<usize>,
        /// Print a JSON report instead of per-snapshot lines
        #[arg(long)]
        json: bool,
    },

    /// Promote current/ snapshots to reference/
    Approve {
        /// Only approve snapshots whose name contains PATTERN (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Only approve new snapshots (no prior reference)
        #[arg(long)]
        new: bool,
        /// Only approve failed snapshots (differ from their reference)
        #[arg(long)]
        failed: bool,
        /// Approve all pending snapshots (default when no kind flags)
        #[arg(long)]
        all: bool,
    },
}

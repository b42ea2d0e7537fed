//! Command-line argument parsing for Hieren
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hieren - routed question answering over equipment manuals
#[derive(Parser, Debug)]
#[command(name = "hieren")]
#[command(version)]
#[command(about = "Answer technical, market and device questions about renewable-energy equipment", long_about = None)]
pub struct Args {
    /// Configuration file path (default: ~/.hieren/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv, -vvv
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Answer a single question
    Ask {
        /// Question text
        #[arg(value_name = "QUERY")]
        query: String,

        /// Id of the user asking (defaults to serving.default_user)
        #[arg(short, long)]
        user: Option<String>,

        /// Print the response envelope as JSON
        #[arg(long)]
        json: bool,

        /// Seconds before giving up (defaults to serving.request_timeout_secs)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Run readiness diagnostics
    Doctor {
        /// Also probe the vector index over the network
        #[arg(long)]
        live: bool,
    },

    /// Run the golden-dataset evaluation
    Eval {
        /// JSON file of cases replacing the built-in set
        #[arg(long, value_name = "FILE")]
        cases: Option<PathBuf>,
    },

    /// Display effective configuration
    Config {
        /// Also write the non-secret settings to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::VeryVerbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

/// Trimmed question text; blank input is rejected before any service is called
pub fn require_query_text(text: &str) -> anyhow::Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Query text is empty");
    }
    Ok(trimmed)
}

impl Verbosity {
    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

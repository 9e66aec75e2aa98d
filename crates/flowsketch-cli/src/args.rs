//! Command-line argument definitions for the Flowsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, parser strictness, pin carry-over and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Flowsketch layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input flowchart file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Report skipped lines and invalid style properties as warnings
    #[arg(long)]
    pub strict: bool,

    /// Previous JSON output whose pinned nodes keep their position
    #[arg(long)]
    pub pins: Option<String>,
}

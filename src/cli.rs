use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Report format
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per file plus a summary
    Human,
    /// Machine-readable report
    Json,
    /// Totals only
    Summary,
}

/// Read ARXML files and report what the reader could not use
#[derive(Parser, Debug, Clone)]
#[command(name = "arxml-check")]
#[command(about = "Read ARXML files, report diagnostics and optionally verify a write/read round trip")]
#[command(version)]
pub struct Cli {
    /// Path to scan for ARXML files (directory or file)
    #[arg(help = "Directory or file to check")]
    pub path: PathBuf,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(
        short = 'e',
        long = "extensions",
        help = "File extensions to process (e.g., 'arxml,xml')"
    )]
    pub extensions: Option<String>,

    /// Increase verbosity (-v verbose, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Abort a file at its first element error
    #[arg(long = "stop-on-error")]
    pub stop_on_error: bool,

    /// Do not report unprocessed elements
    #[arg(long = "no-unprocessed")]
    pub no_unprocessed: bool,

    /// Schema revision used when writing (round trip)
    #[arg(long = "schema-version")]
    pub schema_version: Option<u32>,

    /// Write each model back and verify that re-reading yields the same model
    #[arg(long = "roundtrip")]
    pub roundtrip: bool,

    /// Stop after the first file with errors
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.path.exists() {
            return Err(format!("Path does not exist: {}", self.path.display()));
        }
        if let Some(version) = self.schema_version
            && version == 0
        {
            return Err("Schema version must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        match (self.quiet, self.verbose) {
            (true, _) => VerbosityLevel::Quiet,
            (false, 0) => VerbosityLevel::Normal,
            (false, 1) => VerbosityLevel::Verbose,
            (false, _) => VerbosityLevel::Debug,
        }
    }

    /// Default `tracing` filter directive for the chosen verbosity
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity() {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
        }
    }
}

//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Concord: reconcile feature values reported by several CSV sources
#[derive(Parser)]
#[command(name = "concord")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare three or four sources and show how well they agree
    Compare {
        /// Source files in slot order; the fourth is optional
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Only show features whose name contains this text (table and json)
        #[arg(long)]
        filter: Option<String>,

        /// Write json or csv output to a file; with the table format, write
        /// the csv report there as well
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Classify rows with no values at all as "All Missing"
        #[arg(long)]
        all_missing: bool,
    },

    /// Reconcile sources and export the final data
    Export {
        /// Source files in slot order; the fourth is optional
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output path (default: final_data_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the final value of a feature
        #[arg(long = "set", value_name = "FEATURE=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Serve the reconciliation API over HTTP
    Serve {
        /// Source files to load at startup
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse `FEATURE=VALUE`. The value may be empty or contain `=`.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (feature, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected FEATURE=VALUE, got '{}'", s))?;
    let feature = feature.trim();
    if feature.is_empty() {
        return Err(format!("Missing feature name in '{}'", s));
    }
    Ok((feature.to_string(), value.to_string()))
}

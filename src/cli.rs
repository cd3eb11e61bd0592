//! CLI argument parsing for stracegraph

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the node and edge tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable tables (default)
    Text,
    /// CSV for spreadsheets and dataframe loaders
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "stracegraph")]
#[command(version)]
#[command(
    about = "Encode an strace call sequence as a weighted call graph with centrality features",
    long_about = None
)]
pub struct Cli {
    /// strace text output, one call per line
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Keep only calls from the relevant allow-list
    #[arg(short, long)]
    pub filter: bool,

    /// Write an SVG rendering next to the trace (<FILE>.svg or <FILE>_filtered.svg)
    #[arg(short, long)]
    pub plot: bool,

    /// TOML file replacing the built-in syscall sets and centrality parameters
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this Katz attenuation factor as given, without the per-graph cap
    #[arg(long = "katz-alpha", value_name = "ALPHA")]
    pub katz_alpha: Option<f64>,

    /// Output format for the tables
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

/// Arguments for `stracegraph-monitor`
#[derive(Parser, Debug)]
#[command(name = "stracegraph-monitor")]
#[command(version)]
#[command(about = "Report newly started processes by name", long_about = None)]
pub struct MonitorCli {
    /// Process names to watch
    #[arg(value_name = "NAME", default_values = ["chrome", "spotify"])]
    pub names: Vec<String>,

    /// Seconds between polls
    #[arg(short, long, value_name = "SECS", default_value = "5")]
    pub interval: u64,

    /// Stop after this many polls (runs until interrupted by default)
    #[arg(long = "max-polls", value_name = "N")]
    pub max_polls: Option<u64>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

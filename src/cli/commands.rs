//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Extract Jira boards, sprints, issues and users as a record stream
#[derive(Parser, Debug)]
#[command(name = "tap-jira")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON), rewritten after every stream invocation
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stream catalog
    Discover,

    /// Read records from streams
    Read {
        /// Streams to emit (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Maximum records per stream invocation
        #[arg(long)]
        max_records: Option<usize>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl Commands {
    /// Split the `--streams` argument into names
    pub fn selected_streams(&self) -> Option<Vec<String>> {
        match self {
            Commands::Read {
                streams: Some(streams),
                ..
            } => {
                let names: Vec<String> = streams
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                (!names.is_empty()).then_some(names)
            }
            _ => None,
        }
    }
}

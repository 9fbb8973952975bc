pub mod extract;
pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "revmerge")]
#[command(
    author,
    version,
    about = "Multi-agent code review pipeline: orchestrates analysis stages and merges their output into one report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the review pipeline over a recorded run input
    Run(RunArgs),

    /// Parse one analysis transcript into structured issues
    Extract(ExtractArgs),

    /// Print JSON Schema for the run input record
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to the run input JSON file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to config file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the transcript directory
    #[arg(long)]
    pub transcript_dir: Option<PathBuf>,

    /// Override the report output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Print the output record as JSON instead of the report body
    #[arg(long)]
    pub json: bool,

    /// Exit 1 if any issues were found (CI mode)
    #[arg(long)]
    pub fail_on_issues: bool,
}

#[derive(Parser, Clone)]
pub struct ExtractArgs {
    /// Transcript file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Changed file paths the issues must anchor to (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub changed_files: Vec<String>,
}

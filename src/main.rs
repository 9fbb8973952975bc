use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod extract;
mod input;
mod output;
mod pipeline;
mod provider;
mod report;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("revmerge=debug")
    } else {
        EnvFilter::new("revmerge=warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Extract(args) => cli::extract::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}

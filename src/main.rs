mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{run_analyze, run_document};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            run_analyze(args)?;
        }
        Commands::Document(args) => {
            run_document(args)?;
        }
    }

    Ok(())
}

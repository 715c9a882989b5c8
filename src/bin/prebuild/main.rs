//! prebuild CLI - CMake project description generator

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use prebuild::builder::BuildFileError;
use prebuild::ops::ConfigureError;
use prebuild::util::diagnostic::fatal_block;

fn main() {
    if let Err(e) = run() {
        // stdout is what CMake echoes during configure
        print!("{}", fatal_block(&error_message(&e)));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("prebuild=debug")
    } else {
        EnvFilter::new("prebuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args),
        Commands::Print(args) => commands::print::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Render an error for the halt block, preferring the structured diagnostic.
fn error_message(err: &anyhow::Error) -> String {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<BuildFileError>() {
            return e.to_diagnostic().format();
        }
        if let Some(e) = cause.downcast_ref::<ConfigureError>() {
            return e.to_diagnostic().format();
        }
    }
    format!("{:#}", err)
}

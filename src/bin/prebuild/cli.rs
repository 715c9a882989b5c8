//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use prebuild::core::Platform;
use prebuild::util::flag::parse_truthy;

/// prebuild - generates the CMake description of a native library at configure time
#[derive(Parser)]
#[command(name = "prebuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the CMake file (and mod metadata) for the project
    Configure(ConfigureArgs),

    /// Print the generated CMake file without writing anything
    Print(PrintArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Inputs shared by `configure` and `print`, usually passed in by CMake.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to Prebuild.toml (defaults to <source-dir>/Prebuild.toml)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Project source root (defaults to the current directory)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// CMake binary directory; relative paths are taken from the source root
    #[arg(long)]
    pub build_dir: PathBuf,

    /// Target platform (win64, android32, android64, mac, ios)
    #[arg(long)]
    pub platform: Platform,

    /// Debug build
    #[arg(long, value_parser = parse_truthy, action = ArgAction::Set, default_value = "OFF")]
    pub debug: bool,

    /// Release build
    #[arg(long, value_parser = parse_truthy, action = ArgAction::Set, default_value = "OFF")]
    pub release: bool,

    /// Extra modules to enable, comma separated
    #[arg(long, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Project parameter as NAME=VALUE (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// CMAKE_CXX_COMPILER_ID
    #[arg(long, default_value = "Clang")]
    pub compiler_id: String,

    /// CMAKE_CXX_COMPILER_FRONTEND_VARIANT
    #[arg(long, default_value = "GNU")]
    pub compiler_frontend: String,

    /// CMAKE_CXX_COMPILER_VERSION
    #[arg(long, default_value = "")]
    pub compiler_version: String,
}

#[derive(Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Where to write the generated CMake file
    #[arg(long)]
    pub output_file: PathBuf,
}

#[derive(Args)]
pub struct PrintArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

fn parse_param(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, val)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), val.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{}`", value)),
    }
}

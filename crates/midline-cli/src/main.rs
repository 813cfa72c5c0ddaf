//! midline - tooth mesh midline axis and face angle tool
//!
//! Subcommands:
//! - `info`: structural report for a mesh
//! - `axis`: extract the midline axis
//! - `pick`: select a face by id or point and measure it against the axis

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tooth_midline::AnalysisConfig;

mod commands;
mod output;

#[derive(Parser, Debug)]
#[command(name = "midline", version)]
#[command(about = "Extract tooth midline axes and measure face angles", long_about = None)]
struct Cli {
    /// Analysis settings file (TOML, or JSON by extension)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report mesh structure and health
    Info(commands::info::InfoArgs),
    /// Extract the midline axis
    Axis(commands::axis::AxisArgs),
    /// Pick a face and report its angle to the midline
    Pick(commands::pick::PickArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config: AnalysisConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let opts = GlobalOpts {
        config: load_config(cli.config.as_ref())?,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Info(args) => commands::info::run(args, &opts),
        Commands::Axis(args) => commands::axis::run(args, &opts),
        Commands::Pick(args) => commands::pick::run(args, &opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["midline", "info", "tooth.obj", "--format", "json", "-vv"])
            .expect("parses");
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Info(_)));
    }
}

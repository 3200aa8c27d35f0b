//! CLI module for ckfind.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Compile saved file-search specifications into `find` invocations and run them.
#[derive(Debug, Parser)]
#[command(name = "ckfind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a specification and report its matches
    Run(commands::RunArgs),

    /// Print the command a specification compiles to
    Compile(commands::CompileArgs),

    /// Manage saved specifications
    #[command(subcommand)]
    Specs(commands::SpecsCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
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
    fn test_parse_run() {
        let cli = Cli::parse_from(["ckfind", "-f", "json", "run", "logs", "--no-actions"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.source.name.as_deref(), Some("logs"));
                assert!(args.no_actions);
                assert!(!args.capture);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_name_conflicts_with_file() {
        let result = Cli::try_parse_from(["ckfind", "compile", "logs", "--file", "x.json"]);
        assert!(result.is_err());
    }
}

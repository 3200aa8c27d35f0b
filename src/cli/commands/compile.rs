use anyhow::Result;
use clap::Args;

use super::run::SpecSource;
use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};
use crate::services::compile_with_program;

#[derive(Debug, Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub source: SpecSource,

    /// Leave the action group out of the compiled command
    #[arg(long)]
    pub no_actions: bool,
}

/// Print the command a specification compiles to without running it.
pub async fn handle_compile(args: CompileArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let mut spec = args.source.load(&config)?;
    if args.no_actions {
        spec.enable_action_options = false;
    }

    let command = compile_with_program(&spec, !args.no_actions, args.source.program(&config));
    if verbose {
        eprintln!("{} argument(s)", command.len());
    }
    println!("{}", formatter.format_command(&command));

    Ok(())
}

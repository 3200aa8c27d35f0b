use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Initialize configuration file")]
    Init {
        #[arg(long, help = "Force overwrite existing config")]
        force: bool,
    },
    #[command(about = "Show current configuration")]
    Show,
    #[command(about = "Show configuration file path")]
    Path,
}

pub async fn handle_config(cmd: ConfigCommand, format: OutputFormat, _verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);

    match cmd {
        ConfigCommand::Init { force } => {
            let config_path = Config::config_path()
                .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at: {}\nUse --force to overwrite.",
                    config_path.display()
                );
            }

            let path = Config::default()
                .save()
                .context("failed to create config")?;
            println!(
                "{}",
                formatter.format_message(&format!("Created config at: {}", path.display()))
            );
        }
        ConfigCommand::Show => {
            let config = Config::load()?;
            let path = Config::config_path().filter(|p| p.exists());
            println!("{}", formatter.format_config(&config, path.as_deref()));
        }
        ConfigCommand::Path => {
            let path = Config::config_path()
                .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
            let state = if path.exists() { "active" } else { "would be" };
            println!("Config ({state}): {}", path.display());
        }
    }

    Ok(())
}

//! Saved specification management.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::{Formatter, get_formatter};
use crate::error::StoreError;
use crate::models::{Config, OutputFormat};
use crate::services::{SpecStore, compile_with_program, export_json};

#[derive(Debug, Subcommand)]
pub enum SpecsCommand {
    /// List saved specifications
    List,

    /// Show a saved specification and the command it compiles to
    Show {
        /// Name or slug
        name: String,
    },

    /// Save a specification document from a JSON file
    Import {
        /// Path to the JSON document
        path: PathBuf,

        /// Display name to store it under (defaults to the document's name)
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Write a saved specification as JSON
    Export {
        /// Name or slug
        name: String,

        /// Output file (defaults to stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Delete a saved specification
    Remove {
        /// Name or slug
        name: String,
    },
}

pub async fn handle_specs(cmd: SpecsCommand, format: OutputFormat, verbose: bool) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load()?;
    let store = SpecStore::from_config(&config)?;

    if verbose {
        eprintln!("Specifications: {}", store.storage_dir().display());
    }

    match cmd {
        SpecsCommand::List => {
            let specs = store.list().context("failed to list specifications")?;
            println!("{}", formatter.format_spec_list(&specs, store.storage_dir()));
        }
        SpecsCommand::Show { name } => {
            let spec = load_existing(&store, &name)?;
            let command = compile_with_program(&spec, true, &config.search.program);
            println!("{}", formatter.format_spec(&spec, &command));
        }
        SpecsCommand::Import { path, name } => {
            let saved = store
                .import_file(&path, name.as_deref())
                .with_context(|| format!("failed to import {}", path.display()))?;
            print_message(
                formatter.as_ref(),
                &format!("Saved '{}' to {}", saved.name, saved.path.display()),
            );
        }
        SpecsCommand::Export { name, output } => {
            let spec = load_existing(&store, &name)?;
            let json = export_json(&spec)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    print_message(
                        formatter.as_ref(),
                        &format!("Exported '{}' to {}", spec.spec_name, path.display()),
                    );
                }
                None => print!("{json}"),
            }
        }
        SpecsCommand::Remove { name } => {
            if !store.remove(&name)? {
                anyhow::bail!(StoreError::NotFound(name));
            }
            print_message(formatter.as_ref(), &format!("Removed '{name}'"));
        }
    }

    Ok(())
}

fn load_existing(store: &SpecStore, name: &str) -> Result<crate::models::Specification> {
    Ok(store
        .load(name)?
        .ok_or_else(|| StoreError::NotFound(name.to_string()))?)
}

fn print_message(formatter: &dyn Formatter, message: &str) {
    println!("{}", formatter.format_message(message));
}

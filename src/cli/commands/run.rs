//! Run command implementation.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::cli::output::{get_formatter, result_status};
use crate::error::StoreError;
use crate::models::{Config, ExecutionOptions, OutputFormat, Specification};
use crate::services::{OutputSink, SpecStore, execute_specification, render_command};

/// Exit status reported when a run is interrupted.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Where a specification comes from: the store, a file, or ad-hoc defaults.
#[derive(Debug, Args)]
pub struct SpecSource {
    /// Saved specification name or slug
    #[arg(conflicts_with = "file")]
    pub name: Option<String>,

    /// Read the specification from a JSON file instead of the store
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Override the start location(s)
    #[arg(long, short = 's', value_name = "PATH")]
    pub start: Option<String>,

    /// Override the search text
    #[arg(long, short = 't', value_name = "TEXT")]
    pub text: Option<String>,

    /// Program to invoke instead of the configured one
    #[arg(long, value_name = "PROGRAM")]
    pub program: Option<String>,
}

impl SpecSource {
    /// Resolve the specification and apply command-line overrides.
    pub fn load(&self, config: &Config) -> Result<Specification> {
        let mut spec = if let Some(ref path) = self.file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("invalid specification in {}", path.display()))?
        } else if let Some(ref name) = self.name {
            let store = SpecStore::from_config(config)?;
            store
                .load(name)?
                .ok_or_else(|| StoreError::NotFound(name.clone()))?
        } else {
            Specification::default()
        };

        if let Some(ref start) = self.start {
            spec.start_location = start.clone();
        }
        if let Some(ref text) = self.text {
            spec.search_text = text.clone();
        }
        Ok(spec)
    }

    pub fn program<'a>(&'a self, config: &'a Config) -> &'a str {
        self.program.as_deref().unwrap_or(&config.search.program)
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SpecSource,

    /// Leave the action group out of the compiled command
    #[arg(long)]
    pub no_actions: bool,

    /// Capture matches instead of streaming the program's output
    #[arg(long, short = 'c')]
    pub capture: bool,

    /// Do not refine captured matches by file contents
    #[arg(long)]
    pub no_content_filter: bool,
}

/// Handle the run command, returning the exit code to report.
pub async fn handle_run(
    args: RunArgs,
    format: OutputFormat,
    verbose: bool,
    cancel: CancellationToken,
) -> Result<i32> {
    let config = Config::load()?;
    let formatter = get_formatter(format);
    let spec = args.source.load(&config)?;
    let program = args.source.program(&config);

    // Structured formats need the match list.
    let capture = args.capture || config.search.capture_matches || format != OutputFormat::Text;
    let options = ExecutionOptions {
        include_actions: !args.no_actions,
        capture_matches: capture,
        filter_content: !args.no_content_filter && config.search.filter_content,
    };

    let start_time = Instant::now();
    let spinner = capture.then(|| searching_spinner(&spec));

    // Text output goes straight to stdout; other formats print the result.
    let mut stdout = tokio::io::stdout();
    let sink: Option<OutputSink<'_>> = if format == OutputFormat::Text {
        Some(&mut stdout)
    } else {
        None
    };
    let result = execute_specification(&spec, options, program, sink, None, &cancel).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if verbose {
        eprintln!("Command: {}", render_command(&result.command));
        eprintln!(
            "{} match(es), {} in {:.2}s",
            result.len(),
            result_status(&result),
            start_time.elapsed().as_secs_f64()
        );
    }

    if result.cancelled {
        eprintln!("{}", formatter.format_error("search interrupted"));
        return Ok(INTERRUPTED_EXIT_CODE);
    }

    if format != OutputFormat::Text {
        println!("{}", formatter.format_result(&result));
    }

    Ok(result.exit_code)
}

fn searching_spinner(spec: &Specification) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
    {
        pb.set_style(style);
    }
    pb.set_message(format!("Searching {}", spec.start_location));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SpecSource {
        SpecSource {
            name: None,
            file: None,
            start: None,
            text: None,
            program: None,
        }
    }

    #[test]
    fn test_defaults_without_name_or_file() {
        let spec = source().load(&Config::default()).unwrap();
        assert_eq!(spec, Specification::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        let saved = Specification::new("/srv").with_search_text("old");
        std::fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();

        let mut src = source();
        src.file = Some(path);
        src.text = Some("new".to_string());
        let spec = src.load(&Config::default()).unwrap();
        assert_eq!(spec.start_location, "/srv");
        assert_eq!(spec.search_text, "new");
    }

    #[test]
    fn test_missing_named_spec() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.specs_dir = Some(dir.path().to_path_buf());

        let mut src = source();
        src.name = Some("nothing here".to_string());
        let err = src.load(&config).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_program_override() {
        let config = Config::default();
        let mut src = source();
        assert_eq!(src.program(&config), "find");
        src.program = Some("gfind".to_string());
        assert_eq!(src.program(&config), "gfind");
    }
}

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::{Config, ExecutionResult, OutputFormat, SavedSpecification, Specification};
use crate::services::render_command;

pub trait Formatter {
    fn format_result(&self, result: &ExecutionResult) -> String;
    fn format_command(&self, command: &[String]) -> String;
    fn format_spec_list(&self, specs: &[SavedSpecification], dir: &Path) -> String;
    fn format_spec(&self, spec: &Specification, command: &[String]) -> String;
    fn format_config(&self, config: &Config, path: Option<&Path>) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

/// Names of the option groups that contribute to the compiled command.
fn enabled_groups(spec: &Specification) -> Vec<&'static str> {
    [
        (spec.enable_text_search, "text"),
        (spec.enable_name_path_tests, "name/path"),
        (spec.enable_time_filters, "time"),
        (spec.enable_size_filters, "size"),
        (spec.enable_type_filters, "type"),
        (spec.enable_permission_ownership, "permissions"),
        (spec.enable_traversal_filters, "traversal"),
        (spec.enable_action_options, "actions"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect()
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

pub fn result_status(result: &ExecutionResult) -> String {
    if result.cancelled {
        format!("cancelled (exit code {})", result.exit_code)
    } else {
        format!("exit code {}", result.exit_code)
    }
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_result(&self, result: &ExecutionResult) -> String {
        result
            .matches
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_command(&self, command: &[String]) -> String {
        render_command(command)
    }

    fn format_spec_list(&self, specs: &[SavedSpecification], dir: &Path) -> String {
        if specs.is_empty() {
            return format!("No saved specifications in {}", dir.display());
        }

        let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
        let mut lines = vec![
            format!("Saved specifications ({})", dir.display()),
            "-".repeat(22),
        ];
        lines.extend(
            specs
                .iter()
                .map(|s| format!("  {:width$}  {}", s.name, s.slug, width = width)),
        );
        lines.join("\n")
    }

    fn format_spec(&self, spec: &Specification, command: &[String]) -> String {
        let lines = [
            format!("Name:      {}", or_dash(&spec.spec_name)),
            format!("Start:     {}", or_dash(&spec.start_location)),
            format!("Text:      {}", or_dash(&spec.search_text)),
            format!("Include:   {}", or_dash(&spec.include_patterns)),
            format!("Exclude:   {}", or_dash(&spec.exclude_patterns)),
            format!("Groups:    {}", enabled_groups(spec).join(", ")),
            format!("Command:   {}", render_command(command)),
        ];
        lines.join("\n")
    }

    fn format_config(&self, config: &Config, path: Option<&Path>) -> String {
        let mut lines = Vec::new();
        if let Some(path) = path {
            lines.push(format!("# {}", path.display()));
        }
        lines.push("[search]".to_string());
        lines.push(format!("program = \"{}\"", config.search.program));
        lines.push(format!("capture_matches = {}", config.search.capture_matches));
        lines.push(format!("filter_content = {}", config.search.filter_content));
        lines.push(format!("default_format = \"{}\"", config.search.default_format));
        lines.push(String::new());
        lines.push("[storage]".to_string());
        match config.specs_dir() {
            Ok(dir) => lines.push(format!("specs_dir = \"{}\"", dir.display())),
            Err(e) => lines.push(format!("# specs_dir unavailable: {e}")),
        }
        lines.join("\n")
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    command: &'a [String],
    rendered: String,
}

#[derive(Serialize)]
struct SpecListOutput<'a> {
    directory: &'a Path,
    specifications: &'a [SavedSpecification],
}

#[derive(Serialize)]
struct ConfigOutput<'a> {
    path: Option<&'a Path>,
    config: &'a Config,
    specs_dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| {
            let error = e.to_string();
            let fallback = MessageOutput {
                message: None,
                error: Some(&error),
            };
            serde_json::to_string(&fallback).unwrap_or_default()
        })
    }
}

impl Formatter for JsonFormatter {
    fn format_result(&self, result: &ExecutionResult) -> String {
        self.render(result)
    }

    fn format_command(&self, command: &[String]) -> String {
        self.render(&CommandOutput {
            command,
            rendered: render_command(command),
        })
    }

    fn format_spec_list(&self, specs: &[SavedSpecification], dir: &Path) -> String {
        self.render(&SpecListOutput {
            directory: dir,
            specifications: specs,
        })
    }

    fn format_spec(&self, spec: &Specification, _command: &[String]) -> String {
        self.render(spec)
    }

    fn format_config(&self, config: &Config, path: Option<&Path>) -> String {
        self.render(&ConfigOutput {
            path,
            config,
            specs_dir: config.specs_dir().ok(),
        })
    }

    fn format_message(&self, message: &str) -> String {
        JsonFormatter::new(false).render(&MessageOutput {
            message: Some(message),
            error: None,
        })
    }

    fn format_error(&self, error: &str) -> String {
        JsonFormatter::new(false).render(&MessageOutput {
            message: None,
            error: Some(error),
        })
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_result(&self, result: &ExecutionResult) -> String {
        let mut lines = vec![
            "## Search Results\n".to_string(),
            format!("**Command:** `{}`\n", render_command(&result.command)),
            format!(
                "Found {} match(es), {}\n",
                result.matches.len(),
                result_status(result)
            ),
        ];
        lines.extend(
            result
                .matches
                .iter()
                .map(|path| format!("- `{}`", path.display())),
        );
        lines.join("\n")
    }

    fn format_command(&self, command: &[String]) -> String {
        format!("```sh\n{}\n```", render_command(command))
    }

    fn format_spec_list(&self, specs: &[SavedSpecification], dir: &Path) -> String {
        if specs.is_empty() {
            return format!("## No saved specifications\n\nDirectory: `{}`", dir.display());
        }

        let mut lines = vec![
            "## Saved Specifications\n".to_string(),
            "| Name | Slug |".to_string(),
            "|------|------|".to_string(),
        ];
        lines.extend(
            specs
                .iter()
                .map(|s| format!("| {} | `{}` |", s.name, s.slug)),
        );
        lines.join("\n")
    }

    fn format_spec(&self, spec: &Specification, command: &[String]) -> String {
        let lines = [
            format!("## {}\n", or_dash(&spec.spec_name)),
            format!("**Start:** `{}`\n", or_dash(&spec.start_location)),
            format!("**Text:** {}\n", or_dash(&spec.search_text)),
            format!("**Groups:** {}\n", enabled_groups(spec).join(", ")),
            "```sh".to_string(),
            render_command(command),
            "```".to_string(),
        ];
        lines.join("\n")
    }

    fn format_config(&self, config: &Config, path: Option<&Path>) -> String {
        let mut lines = vec!["## Configuration\n".to_string()];
        if let Some(path) = path {
            lines.push(format!("**File:** `{}`\n", path.display()));
        }
        lines.push("| Key | Value |".to_string());
        lines.push("|-----|-------|".to_string());
        lines.push(format!("| search.program | `{}` |", config.search.program));
        lines.push(format!(
            "| search.capture_matches | {} |",
            config.search.capture_matches
        ));
        lines.push(format!(
            "| search.filter_content | {} |",
            config.search.filter_content
        ));
        lines.push(format!(
            "| search.default_format | {} |",
            config.search.default_format
        ));
        if let Ok(dir) = config.specs_dir() {
            lines.push(format!("| storage.specs_dir | `{}` |", dir.display()));
        }
        lines.join("\n")
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("> **Error:** {}", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

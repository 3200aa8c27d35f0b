//! Execution-related models: output formats, run options and results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
    /// Documentation-friendly Markdown format
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Switches for a single specification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Compile the specification's action group; otherwise a bare `-print`.
    pub include_actions: bool,
    /// Buffer stdout and return it as the match list.
    pub capture_matches: bool,
    /// Refine captured matches by file content when the spec asks for it.
    pub filter_content: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            include_actions: true,
            capture_matches: false,
            filter_content: true,
        }
    }
}

impl ExecutionOptions {
    /// Options for collecting matches in-process instead of letting actions run.
    pub fn capture() -> Self {
        Self {
            include_actions: false,
            capture_matches: true,
            filter_content: true,
        }
    }

    #[must_use]
    pub fn with_actions(mut self, include: bool) -> Self {
        self.include_actions = include;
        self
    }

    #[must_use]
    pub fn with_content_filter(mut self, filter: bool) -> Self {
        self.filter_content = filter;
        self
    }
}

/// Outcome of running a compiled command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Child exit code, `128 + signal` when killed, `-1` when it never ran.
    pub exit_code: i32,
    /// Captured match paths in output order.
    pub matches: Vec<PathBuf>,
    /// The literal argv that was executed.
    pub command: Vec<String>,
    /// Set when the run was stopped through its cancellation token.
    #[serde(default)]
    pub cancelled: bool,
}

impl ExecutionResult {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }

    /// The run could not be started at all.
    pub fn infrastructure_failure(command: Vec<String>, exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::new(command)
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.cancelled
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }
}

/// Index record for a stored specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSpecification {
    /// Display name
    pub name: String,
    /// Filesystem-safe storage key
    pub slug: String,
    /// Location of the JSON document
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_execution_options_default() {
        let options = ExecutionOptions::default();
        assert!(options.include_actions);
        assert!(!options.capture_matches);
        assert!(options.filter_content);

        let capture = ExecutionOptions::capture().with_content_filter(false);
        assert!(!capture.include_actions);
        assert!(capture.capture_matches);
        assert!(!capture.filter_content);
    }

    #[test]
    fn test_infrastructure_failure() {
        let result = ExecutionResult::infrastructure_failure(vec!["find".to_string()], -1);
        assert_eq!(result.exit_code, -1);
        assert!(result.is_empty());
        assert!(!result.success());
        assert_eq!(result.command, vec!["find".to_string()]);
    }
}

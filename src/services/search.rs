//! Runs a specification end to end: compile, execute, filter.

use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::compiler::compile_with_program;
use super::content_filter::filter_matches;
use super::executor::{OutputSink, execute};
use crate::models::{ExecutionOptions, ExecutionResult, Specification};

/// Compile `spec`, run it with `program` and post-process the matches.
///
/// With `include_actions` off the action group is ignored and a bare `-print`
/// is used. When matches are captured they are refined by content (if the
/// specification asks for it and `filter_content` is set) and the surviving
/// paths are written to `stdout_sink`, one per line.
pub async fn execute_specification(
    spec: &Specification,
    options: ExecutionOptions,
    program: &str,
    mut stdout_sink: Option<OutputSink<'_>>,
    stderr_sink: Option<OutputSink<'_>>,
    cancel: &CancellationToken,
) -> ExecutionResult {
    let mut run_spec = spec.clone();
    if !options.include_actions {
        run_spec.enable_action_options = false;
    }

    let command = compile_with_program(&run_spec, options.include_actions, program);
    info!(program, capture = options.capture_matches, "running search");

    // Reborrow so the trait object lifetime shrinks to this call.
    let forward = if options.capture_matches {
        None
    } else {
        stdout_sink.as_deref_mut().map(|s| -> OutputSink<'_> { s })
    };
    let mut result = execute(
        &command,
        options.capture_matches,
        forward,
        stderr_sink,
        cancel,
    )
    .await;

    if !options.capture_matches || result.cancelled {
        return result;
    }

    if options.filter_content && spec.wants_content_filter() {
        result.matches = filter_matches(std::mem::take(&mut result.matches), spec);
    }

    if let Some(out) = stdout_sink
        && let Err(e) = write_matches(out, &result).await
    {
        debug!(error = %e, "failed to forward matches");
    }

    result
}

async fn write_matches(out: OutputSink<'_>, result: &ExecutionResult) -> std::io::Result<()> {
    for path in &result.matches {
        out.write_all(path.as_os_str().as_encoded_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    // Compiled commands keep the symlink flag after the start paths; GNU find
    // only accepts it before them, so the wrapper moves it to the front.
    const FIND_WRAPPER: &str = r#"#!/bin/sh
flag=
for arg do
  shift
  case "$arg" in
    -H|-L|-P) flag=$arg ;;
    *) set -- "$@" "$arg" ;;
  esac
done
exec find ${flag:+"$flag"} "$@"
"#;

    /// Writes the wrapper outside any fixture so it never shows up in matches.
    fn find_wrapper() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("find-wrapper");
        std::fs::write(&path, FIND_WRAPPER).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path.to_string_lossy().into_owned())
    }

    // `find` applies the hidden-path test to the whole path, so the fixture
    // directory itself must not start with a dot.
    fn fixture_dir() -> tempfile::TempDir {
        tempfile::Builder::new()
            .prefix("ckfind-test-")
            .tempdir()
            .unwrap()
    }

    #[tokio::test]
    async fn test_capture_with_content_filter() {
        let dir = fixture_dir();
        std::fs::write(dir.path().join("example.txt"), "hello world").unwrap();
        std::fs::write(dir.path().join("other.txt"), "goodbye").unwrap();
        std::fs::write(dir.path().join(".ignored"), "hello hidden").unwrap();

        let mut spec = Specification::new(dir.path().to_string_lossy()).with_search_text("hello");
        spec.text_options.search_in_file_names = false;
        spec.enable_type_filters = true;
        spec.type_options.type_enabled = true;
        spec.type_options.type_letters = "f".to_string();

        let (_bin, find) = find_wrapper();
        let cancel = CancellationToken::new();
        let mut out: Vec<u8> = Vec::new();
        let result = execute_specification(
            &spec,
            ExecutionOptions::capture(),
            &find,
            Some(&mut out),
            None,
            &cancel,
        )
        .await;

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.matches, vec![dir.path().join("example.txt")]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n", dir.path().join("example.txt").display())
        );
    }

    #[tokio::test]
    async fn test_capture_without_content_filter_keeps_all_matches() {
        let dir = fixture_dir();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        std::fs::write(dir.path().join("b.txt"), "beta").unwrap();

        let mut spec = Specification::new(dir.path().to_string_lossy()).with_search_text("alpha");
        spec.text_options.search_in_file_names = false;

        let (_bin, find) = find_wrapper();
        let cancel = CancellationToken::new();
        let options = ExecutionOptions::capture().with_content_filter(false);
        let result = execute_specification(&spec, options, &find, None, None, &cancel).await;

        let mut matches = result.matches.clone();
        matches.sort();
        assert_eq!(
            matches,
            vec![
                dir.path().to_path_buf(),
                dir.path().join("a.txt"),
                dir.path().join("b.txt")
            ]
        );
    }

    #[tokio::test]
    async fn test_actions_excluded_from_command() {
        let dir = fixture_dir();
        let mut spec = Specification::new(dir.path().to_string_lossy());
        spec.action_options.print = false;
        spec.action_options.delete_matches = true;

        let (_bin, find) = find_wrapper();
        let cancel = CancellationToken::new();
        let result =
            execute_specification(&spec, ExecutionOptions::capture(), &find, None, None, &cancel)
                .await;

        assert!(!result.command.iter().any(|t| t == "-delete"));
        assert_eq!(result.command.last().map(String::as_str), Some("-print"));
        assert!(dir.path().is_dir());
        assert_eq!(result.matches, vec![PathBuf::from(dir.path())]);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let cancel = CancellationToken::new();
        let result = execute_specification(
            &Specification::default(),
            ExecutionOptions::capture(),
            "/nonexistent/find",
            None,
            None,
            &cancel,
        )
        .await;
        assert_eq!(result.exit_code, -1);
        assert!(result.matches.is_empty());
        assert_eq!(result.command[0], "/nonexistent/find");
    }
}

//! End-to-end tests: specifications through the store, the compiler and a real `find`.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use ckfind::models::{ExecutionOptions, Specification, TimePreset};
use ckfind::services::{SpecStore, compile, execute_specification};
use tokio_util::sync::CancellationToken;

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

// Hidden-path tests look at the whole path, so fixtures must not live under a dot directory.
fn fixture_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("ckfind-e2e-")
        .tempdir()
        .unwrap()
}

// Compiled commands place the symlink flag after the start paths. GNU find
// rejects that order, so runs go through a wrapper that moves it first.
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

fn find_wrapper() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("find-wrapper");
    std::fs::write(&path, FIND_WRAPPER).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn test_default_specification_compiles_to_plain_find() {
    assert_eq!(
        compile(&Specification::default(), true),
        argv(&["find", ".", "-P", "!", "-name", ".*", "!", "-path", "*/.*", "-print"])
    );
}

#[test]
fn test_saved_specification_compiles_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = SpecStore::open(dir.path()).unwrap();

    let mut spec = Specification::new("/var/log").with_search_text("error");
    spec.include_patterns = "*.log".to_string();
    spec.enable_time_filters = true;
    spec.time_options.preset = TimePreset::PastDay;

    let saved = store.save(&spec, Some("  Recent Errors ")).unwrap();
    assert_eq!(saved.name, "Recent Errors");
    assert_eq!(saved.slug, "recent-errors");

    let by_name = store.load("Recent Errors").unwrap().unwrap();
    let by_slug = store.load("recent-errors").unwrap().unwrap();
    assert_eq!(by_name, by_slug);
    assert_eq!(compile(&by_name, true), compile(&spec, true));

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, dir.path().join("recent-errors.json"));

    assert!(store.remove("Recent Errors").unwrap());
    assert!(store.load("recent-errors").unwrap().is_none());
}

#[test]
fn test_persisted_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = SpecStore::open(dir.path()).unwrap();
    store
        .save(&Specification::default().with_name("Layout"), None)
        .unwrap();

    let text = std::fs::read_to_string(dir.path().join("layout.json")).unwrap();
    assert!(text.ends_with("}\n"));
    assert!(text.contains("\n  \"specName\": \"Layout\""));
    assert!(text.contains("\"timeOptions\": {"));
}

#[tokio::test]
async fn test_content_search_finds_single_file() {
    let dir = fixture_dir();
    std::fs::write(dir.path().join("example.txt"), "hello world").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "nothing to see").unwrap();
    std::fs::write(dir.path().join(".ignored"), "hello from a hidden file").unwrap();

    let mut spec = Specification::new(dir.path().to_string_lossy()).with_search_text("hello");
    spec.text_options.search_in_file_names = false;
    spec.enable_type_filters = true;
    spec.type_options.type_enabled = true;
    spec.type_options.type_letters = "f".to_string();

    let (_bin, find) = find_wrapper();
    let cancel = CancellationToken::new();
    let options = ExecutionOptions::capture().with_actions(false);
    let result = execute_specification(&spec, options, &find, None, None, &cancel).await;

    assert!(result.success());
    assert!(!result.cancelled);
    assert_eq!(result.matches, vec![dir.path().join("example.txt")]);
}

#[tokio::test]
async fn test_file_name_search_without_content_filter() {
    let dir = fixture_dir();
    std::fs::write(dir.path().join("Report-2024.txt"), "").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "report inside").unwrap();

    let mut spec = Specification::new(dir.path().to_string_lossy()).with_search_text("report");
    spec.text_options.search_in_contents = false;

    let (_bin, find) = find_wrapper();
    let cancel = CancellationToken::new();
    let result =
        execute_specification(&spec, ExecutionOptions::capture(), &find, None, None, &cancel)
            .await;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.matches, vec![dir.path().join("Report-2024.txt")]);
}

#[tokio::test]
async fn test_streamed_output_reaches_sink() {
    let dir = fixture_dir();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();

    let mut spec = Specification::new(dir.path().to_string_lossy());
    spec.enable_type_filters = true;
    spec.type_options.type_enabled = true;
    spec.type_options.type_letters = "f".to_string();

    let (_bin, find) = find_wrapper();
    let cancel = CancellationToken::new();
    let mut out: Vec<u8> = Vec::new();
    let result = execute_specification(
        &spec,
        ExecutionOptions::default(),
        &find,
        Some(&mut out),
        None,
        &cancel,
    )
    .await;

    assert_eq!(result.exit_code, 0);
    assert!(result.matches.is_empty());
    let printed: Vec<PathBuf> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(PathBuf::from)
        .collect();
    assert_eq!(printed, vec![dir.path().join("a.txt")]);
}

#[tokio::test]
async fn test_missing_start_location_reports_find_failure() {
    let dir = fixture_dir();
    let spec = Specification::new(dir.path().join("does-not-exist").to_string_lossy());

    let (_bin, find) = find_wrapper();
    let cancel = CancellationToken::new();
    let mut err: Vec<u8> = Vec::new();
    let result = execute_specification(
        &spec,
        ExecutionOptions::capture(),
        &find,
        None,
        Some(&mut err),
        &cancel,
    )
    .await;

    assert_ne!(result.exit_code, 0);
    assert_ne!(result.exit_code, -1);
    assert!(result.matches.is_empty());
    let message = String::from_utf8_lossy(&err);
    assert!(message.contains("does-not-exist"), "{message}");
}

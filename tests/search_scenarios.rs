//! End-to-end scenarios S1-S6 from SPEC_FULL.md §8: drive the engine and
//! formatter together against real temporary files, the way the teacher's
//! own integration tests exercise a manager end to end with `tempfile`.

use std::fs;
use std::sync::Arc;

use grepcore::options::OptionContext;
use grepcore::{engine, format};
use tokio::sync::watch;

fn base_options(pattern: &str, paths: Vec<String>) -> OptionContext {
    OptionContext {
        pattern: pattern.to_string(),
        paths,
        ignore_case: false,
        invert_match: false,
        line_number: false,
        count_only: false,
        files_with_matches: false,
        no_filename: false,
        silent: false,
        extended_regexp: false,
        fixed_strings: false,
        word_regexp: false,
        recursive: false,
        max_count: None,
        context_before: 0,
        context_after: 0,
        include: vec![],
        exclude: vec![],
    }
}

async fn run_and_render(options: OptionContext) -> (String, i32) {
    let (_tx, rx) = watch::channel(false);
    let result = engine::run(Arc::new(options.clone()), rx).await;
    let mut out = Vec::new();
    let code = format::render(&mut out, &result, &options).unwrap();
    (String::from_utf8(out).unwrap(), code)
}

#[tokio::test]
async fn s1_plain_match_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "hello world\ntest line\nhello again\n").unwrap();

    let options = base_options("hello", vec![path.to_str().unwrap().to_string()]);
    let (output, code) = run_and_render(options).await;

    assert_eq!(output, "hello world\nhello again\n");
    assert_eq!(code, format::EXIT_MATCH);
}

#[tokio::test]
async fn s2_line_numbers_multiple_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "hello\n").unwrap();
    fs::write(&b, "x\nhello\n").unwrap();

    let mut options = base_options(
        "hello",
        vec![a.to_str().unwrap().to_string(), b.to_str().unwrap().to_string()],
    );
    options.line_number = true;
    let (output, code) = run_and_render(options).await;

    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, vec!["a.txt:1:hello", "b.txt:2:hello"]);
    assert_eq!(code, format::EXIT_MATCH);
}

#[tokio::test]
async fn s3_invert_with_max_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "match\na\nb\nc\nmatch\n").unwrap();

    let mut options = base_options("match", vec![path.to_str().unwrap().to_string()]);
    options.invert_match = true;
    options.max_count = Some(2);
    let (output, code) = run_and_render(options).await;

    assert_eq!(output, "a\nb\n");
    assert_eq!(code, format::EXIT_MATCH);
}

#[tokio::test]
async fn s4_symmetric_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "line1\nline2\ntarget line\nline4\nline5\n").unwrap();

    let mut options = base_options("target", vec![path.to_str().unwrap().to_string()]);
    options.context_before = 1;
    options.context_after = 1;
    let (output, code) = run_and_render(options).await;

    assert_eq!(output, "line2\ntarget line\nline4\n");
    assert_eq!(code, format::EXIT_MATCH);
}

#[tokio::test]
async fn s5_include_exclude_recursive() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Program.cs"), "hello\n").unwrap();
    fs::write(dir.path().join("README.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("debug.log"), "hello\n").unwrap();

    let mut options = base_options("hello", vec![dir.path().to_str().unwrap().to_string()]);
    options.recursive = true;
    options.exclude = vec!["*.log".to_string()];
    let (_tx, rx) = watch::channel(false);
    let result = engine::run(Arc::new(options.clone()), rx).await;

    assert_eq!(result.total_files(), 2);
    assert_eq!(result.total_matches(), 2);
}

#[tokio::test]
async fn s6_count_only_multiple_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "hello\nhello\n").unwrap();
    fs::write(&b, "hello\nworld\n").unwrap();

    let mut options = base_options(
        "hello",
        vec![a.to_str().unwrap().to_string(), b.to_str().unwrap().to_string()],
    );
    options.count_only = true;
    let (output, code) = run_and_render(options).await;

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.contains(':')));
    assert_eq!(code, format::EXIT_MATCH);
}

#[tokio::test]
async fn empty_pattern_matches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "anything\nat all\n").unwrap();

    let options = base_options("", vec![path.to_str().unwrap().to_string()]);
    let (output, code) = run_and_render(options).await;

    assert!(output.is_empty());
    assert_eq!(code, format::EXIT_NO_MATCH);
}

#[tokio::test]
async fn empty_file_yields_no_matches_and_no_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    let options = base_options("anything", vec![path.to_str().unwrap().to_string()]);
    let (_tx, rx) = watch::channel(false);
    let result = engine::run(Arc::new(options), rx).await;

    assert_eq!(result.total_files(), 1);
    assert_eq!(result.total_matches(), 0);
    assert!(!result.any_errors());
}

#[tokio::test]
async fn max_count_caps_multi_hit_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.txt");
    fs::write(&path, "aaaa\n").unwrap();

    let mut options = base_options("a", vec![path.to_str().unwrap().to_string()]);
    options.max_count = Some(3);
    let (_tx, rx) = watch::channel(false);
    let result = engine::run(Arc::new(options), rx).await;

    assert_eq!(result.total_matches(), 3);
}

#[tokio::test]
async fn standard_input_sentinel_is_scheduled_once() {
    let mut options = base_options("x", vec!["-".to_string(), "-".to_string()]);
    options.silent = true;
    let expanded = grepcore::pathsrc::expand_paths(&options);
    assert_eq!(expanded, vec!["-".to_string()]);
}

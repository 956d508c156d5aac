//! End-to-end tests for the exported primitives.
//!
//! Each test runs `comodot-probe`, which calls the C-ABI symbols against a
//! real piped stdin and stdout, exactly as compiled programs do.

mod common;

use common::{reports, run_probe, run_probe_with_env, stdout};

#[test]
fn test_read_line_short() {
    let output = run_probe(b"hi\n", &["line"]);
    assert_eq!(reports(&output), vec![r"line len=4 bytes=hi\n\x00"]);
}

#[test]
fn test_read_line_empty_stdin() {
    let output = run_probe(b"", &["line", "line"]);
    assert_eq!(
        reports(&output),
        vec![r"line len=1 bytes=\x00", r"line len=1 bytes=\x00"]
    );
}

#[test]
fn test_read_line_sequence() {
    let output = run_probe(b"first\n\nlast", &["line", "line", "line"]);
    assert_eq!(
        reports(&output),
        vec![
            r"line len=7 bytes=first\n\x00",
            r"line len=2 bytes=\n\x00",
            r"line len=5 bytes=last\x00",
        ]
    );
}

#[test]
fn test_read_line_long() {
    let content = "x".repeat(10_000);
    let input = format!("{content}\n");
    let output = run_probe(input.as_bytes(), &["line"]);
    assert_eq!(
        reports(&output),
        vec![format!(r"line len=10002 bytes={content}\n\x00")]
    );
}

#[test]
fn test_read_line_small_configured_capacity() {
    let output = run_probe_with_env(
        b"growing past a tiny buffer\n",
        &["line"],
        &[("COMODOT_LINE_CAPACITY", "2")],
    );
    assert_eq!(
        reports(&output),
        vec![r"line len=28 bytes=growing past a tiny buffer\n\x00"]
    );
}

#[test]
fn test_read_int() {
    let output = run_probe(b"42 -7\n", &["int", "int", "int"]);
    assert_eq!(reports(&output), vec!["int 42", "int -7", "int -1"]);
}

#[test]
fn test_read_int_sentinel_collision() {
    // A literal -1 and an exhausted stdin look the same through readInt.
    let output = run_probe(b"-1", &["int", "int"]);
    assert_eq!(reports(&output), vec!["int -1", "int -1"]);

    // The checked variant tells them apart.
    let output = run_probe(b"-1", &["int-checked", "int-checked"]);
    assert_eq!(
        reports(&output),
        vec!["int-checked ok -1", "int-checked none"]
    );
}

#[test]
fn test_read_int_out_of_range() {
    let output = run_probe(b"99999999999999999999", &["int-checked"]);
    assert_eq!(reports(&output), vec!["int-checked out-of-range"]);
}

#[test]
fn test_int_then_line_keeps_rest_of_line() {
    let output = run_probe(b"12 apples\n", &["int", "line"]);
    assert_eq!(
        reports(&output),
        vec!["int 12", r"line len=9 bytes= apples\n\x00"]
    );
}

#[test]
fn test_read_float_truncates_without_echo() {
    let output = run_probe(b"3.75 -2.5 nope", &["float", "float", "float"]);
    assert_eq!(reports(&output), vec!["float 3", "float -2", "float -1"]);
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_read_float_echo_when_enabled() {
    let output = run_probe_with_env(b"3.5", &["float"], &[("COMODOT_ECHO_FLOAT", "1")]);
    assert_eq!(reports(&output), vec!["float 3"]);
    assert_eq!(stdout(&output), "3.500000");
}

#[test]
fn test_read_float_checked_keeps_fraction() {
    let output = run_probe(b"2.25e1", &["float-checked", "float-checked"]);
    assert_eq!(
        reports(&output),
        vec!["float-checked ok 22.5", "float-checked none"]
    );
}

#[test]
fn test_print_and_println() {
    let output = run_probe(
        b"",
        &["print=Hello, ", "println=World!", "print=", "println="],
    );
    assert_eq!(stdout(&output), "Hello, World!\n\n");
    assert!(reports(&output).is_empty());
}

#[test]
fn test_prompt_is_flushed_before_read() {
    let output = run_probe(b"Ada\n", &["print=name? ", "line", "println=done"]);
    assert_eq!(stdout(&output), "name? done\n");
    assert_eq!(reports(&output), vec![r"line len=5 bytes=Ada\n\x00"]);
}

#[test]
fn test_invalid_config_falls_back() {
    let output = run_probe_with_env(
        b"abc\n",
        &["line"],
        &[("COMODOT_LINE_CAPACITY", "zero"), ("COMODOT_LOG", "warn")],
    );
    let reports = reports(&output);
    assert_eq!(reports.last().unwrap(), r"line len=5 bytes=abc\n\x00");
    assert!(
        reports
            .iter()
            .any(|l| l.contains("COMODOT_LINE_CAPACITY")),
        "expected a configuration warning, got {reports:?}"
    );
}

#[test]
fn test_invalid_config_reported_without_init() {
    let output = run_probe_with_env(
        b"7\n",
        &["--skip-init", "int"],
        &[("COMODOT_ECHO_FLOAT", "maybe"), ("COMODOT_LOG", "warn")],
    );
    let reports = reports(&output);
    assert_eq!(reports.last().unwrap(), "int 7");
    assert!(
        reports.iter().any(|l| l.contains("COMODOT_ECHO_FLOAT")),
        "expected a configuration warning, got {reports:?}"
    );
}

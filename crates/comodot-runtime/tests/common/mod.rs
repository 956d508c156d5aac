//! Common test utilities for the probe tests.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run `comodot-probe` with `ops`, feeding `stdin` and setting `envs`.
pub fn run_probe_with_env(stdin: &[u8], ops: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_comodot-probe"));
    command
        .args(ops)
        .env_remove("COMODOT_LINE_CAPACITY")
        .env_remove("COMODOT_ECHO_FLOAT")
        .env_remove("COMODOT_LOG")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().expect("Failed to spawn comodot-probe");
    let mut pipe = child.stdin.take().expect("stdin is piped");
    let input = stdin.to_vec();
    // The probe may stop reading early; a broken pipe here is fine.
    let writer = std::thread::spawn(move || {
        let _ = pipe.write_all(&input);
    });

    let output = child
        .wait_with_output()
        .expect("Failed to wait for comodot-probe");
    writer.join().expect("stdin writer panicked");

    assert!(
        output.status.success(),
        "comodot-probe exited with {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

pub fn run_probe(stdin: &[u8], ops: &[&str]) -> Output {
    run_probe_with_env(stdin, ops, &[])
}

/// The probe's report lines (its stderr).
pub fn reports(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .map(str::to_owned)
        .collect()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

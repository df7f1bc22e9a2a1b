//! Integration tests for the VirtualMK CLI.
//!
//! These tests invoke the `virtualmk` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn virtualmk() -> Command {
    Command::cargo_bin("virtualmk").unwrap()
}

/// Return the workspace root (parent of virtualmk-cli/).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Return the absolute path to a test program file.
fn test_program(name: &str) -> PathBuf {
    workspace_root().join("tests/programs").join(name)
}

/// Helper: write a .mk file into `dir`, returning its path.
fn write_program(dir: &TempDir, source: &str) -> PathBuf {
    let path = dir.path().join("test.mk");
    fs::write(&path, source).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    virtualmk()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: no input file"))
        .stderr(predicate::str::contains("Usage: virtualmk"));
}

#[test]
fn help_flag_exits_0() {
    virtualmk()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn run_without_file_exits_1() {
    virtualmk()
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: no input file"));
}

// ---- Loading ----

#[test]
fn wrong_extension_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prog.txt");
    fs::write(&path, "HLT").unwrap();

    virtualmk()
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: wrong file extension"));
}

#[test]
fn missing_file_exits_1() {
    virtualmk()
        .args(["run", "nonexistent.mk"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read file nonexistent.mk"));
}

// ---- Run ----

#[test]
fn run_addition() {
    virtualmk()
        .args(["run", test_program("arithmetic.mk").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "\nFinished execution \n \nStack: 8 \nRegisters: A = 0  B = 0  C = 0  D = 0  E = 0  F = 0  \n\n",
        ));
}

#[test]
fn bare_path_runs() {
    virtualmk()
        .arg(test_program("arithmetic.mk").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Stack: 8 \n"));
}

#[test]
fn run_register_program() {
    virtualmk()
        .arg(test_program("registers.mk").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("popped value: 6\npopped value: 3\n"))
        .stdout(predicate::str::contains(
            "Registers: A = 6  B = 3  C = 3  D = 2  E = 18  F = 0  ",
        ))
        .stdout(predicate::str::contains("error").not());
}

#[test]
fn run_hypotenuse() {
    virtualmk()
        .arg(test_program("hypotenuse.mk").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("\nStack: 5 \n"))
        .stdout(predicate::str::contains("Finished execution"));
}

#[test]
fn recoverable_errors_continue() {
    let output = virtualmk()
        .arg(test_program("recoverable.mk").to_str().unwrap())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let errors: Vec<&str> = stdout.lines().filter(|l| l.contains("| error:")).collect();
    assert_eq!(
        errors,
        vec![
            "1 | error: could not pop value, stack is empty ",
            "3 | error: stack has not enough values",
            "7 | error: value on stack is zero",
            "11 | error: could not calculate square root from negative number: -9",
            "14 | error: could not be divide by zero",
        ]
    );
    assert!(stdout.ends_with(
        "Finished execution \n \nStack: -9 0 \nRegisters: A = 0  B = 0  C = 0  D = 0  E = 0  F = 0  \n\n"
    ));
}

#[test]
fn fatal_error_still_exits_0() {
    virtualmk()
        .arg(test_program("truncated.mk").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "4 | error: not enough instructions\n\nFinished execution \n \nStack: 1 \n",
        ));
}

#[test]
fn unknown_instruction_halts() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "psh 2 jmp 0 psh 3 hlt");

    virtualmk()
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 | error: instruction unknown: JMP"))
        .stdout(predicate::str::contains("Stack: 2 \n"));
}

#[test]
fn logging_goes_to_stderr() {
    virtualmk()
        .env("RUST_LOG", "debug")
        .arg(test_program("arithmetic.mk").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\nFinished execution"))
        .stderr(predicate::str::contains("dispatch"));
}

// ---- Tokens ----

#[test]
fn tokens_lists_normalized_stream() {
    let dir = TempDir::new().unwrap();
    let path = write_program(&dir, "psh 1.5e2\n\n  set a s\thlt\n");

    virtualmk()
        .args(["tokens", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "0\tPSH\n1\t1.5E2\n2\tSET\n3\tA\n4\tS\n5\tHLT\n",
        ));
}

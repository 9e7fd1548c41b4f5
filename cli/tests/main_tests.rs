//! # mkipk CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `mkipk` binary: standard flags and argument
//! validation exit codes.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    mkipk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input").and(predicate::str::contains("--output")));
}

#[test]
fn test_help_describes_input_layout() {
    mkipk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Input directory layout:")
                .and(predicate::str::contains("│   └── postinst"))
                .and(predicate::str::contains("└── data")),
        );
}

#[test]
fn test_sorted_and_fs_order_are_exclusive() {
    mkipk_cmd()
        .args(["-i", "in", "-o", "out", "--sorted", "--fs-order"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_short_help_flag() {
    mkipk_cmd().arg("-h").assert().success();
}

#[test]
fn test_version_flag() {
    mkipk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Missing required flags are usage errors with exit code 1.
#[test]
fn test_missing_input_is_usage_error() {
    mkipk_cmd()
        .args(["-o", "out.ipk"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_missing_output_is_usage_error() {
    mkipk_cmd()
        .args(["-i", "in"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    mkipk_cmd()
        .args(["-i", "in", "-o", "out", "--compression-level", "9"])
        .assert()
        .code(1);
}

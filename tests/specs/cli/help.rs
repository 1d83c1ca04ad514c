// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tug` help and completion surface.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn tug() -> Command {
    cargo_bin_cmd!("tug")
}

#[test]
fn help_lists_the_command_sections() {
    tug()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Working on tickets:"))
        .stdout(predicate::str::contains("Housekeeping:"))
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("abandon"));
}

#[test]
fn help_shows_the_quickstart() {
    tug()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Get started:"))
        .stdout(predicate::str::contains("tug checkout --ticket 1"));
}

#[test]
fn subcommand_help_carries_examples() {
    tug()
        .args(["checkout", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("--base"));
}

#[test]
fn unknown_subcommand_fails() {
    tug().arg("frobnicate").assert().failure();
}

#[test]
fn completion_generates_a_bash_script() {
    tug()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tug"));
}

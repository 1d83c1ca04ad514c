// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tug config` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tug() -> Command {
    cargo_bin_cmd!("tug")
}

fn git_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::process::Command::new("git")
        .args(["init", "-b", "main"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    temp
}

#[test]
fn config_show_prints_the_defaults() {
    let temp = git_repo();
    tug()
        .args(["config", "show"])
        .env_remove("TUG_TRUNK")
        .env_remove("TUG_REMOTE")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("trunk       = main"))
        .stdout(predicate::str::contains("remote      = origin"))
        .stdout(predicate::str::contains("tracker-url = (unset)"));
}

#[test]
fn config_set_round_trips() {
    let temp = git_repo();
    tug()
        .args(["config", "set", "username", "alice"])
        .current_dir(temp.path())
        .assert()
        .success();

    tug()
        .args(["config", "show"])
        .env_remove("TUG_USERNAME")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("username    = alice"));
}

#[test]
fn config_set_rejects_unknown_keys() {
    let temp = git_repo();
    tug()
        .args(["config", "set", "palette", "solarized"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn config_outside_a_repository_fails() {
    let temp = TempDir::new().unwrap();
    tug()
        .args(["config", "show"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tug checkout` argument surface.

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
    for args in [
        vec!["init", "-b", "main"],
        vec!["-c", "user.email=t@t", "-c", "user.name=t", "commit", "--allow-empty", "-m", "init"],
    ] {
        std::process::Command::new("git")
            .args(&args)
            .current_dir(temp.path())
            .output()
            .unwrap();
    }
    temp
}

#[test]
fn checkout_needs_a_ticket_or_branch() {
    let temp = git_repo();
    tug()
        .arg("checkout")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "at least one of ticket or branch",
        ));
}

#[test]
fn checkout_rejects_a_malformed_ticket_name() {
    let temp = git_repo();
    tug()
        .args(["checkout", "--ticket", "not a ticket"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ticket name"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn checkout_of_a_valid_ticket_needs_a_tracker() {
    let temp = git_repo();
    tug()
        .args(["checkout", "--ticket", "1"])
        .env_remove("TUG_TRACKER_URL")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no tracker URL configured"));
}

#[test]
fn checkout_of_a_missing_branch_fails_with_a_hint() {
    let temp = git_repo();
    tug()
        .args(["checkout", "--branch", "nope"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist locally"))
        .stderr(predicate::str::contains("tug tickets"));
}

#[test]
fn checkout_of_an_existing_branch_succeeds() {
    let temp = git_repo();
    std::process::Command::new("git")
        .args(["branch", "feature"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    tug()
        .args(["checkout", "--branch", "feature"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "On local branch \"feature\" without associated ticket.",
        ));
}

#[test]
fn base_must_come_with_a_ticket() {
    let temp = git_repo();
    std::process::Command::new("git")
        .args(["branch", "feature"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    tug()
        .args(["checkout", "--branch", "feature", "--base", "main"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "base must not be specified if no ticket",
        ));
}

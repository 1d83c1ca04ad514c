// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `tug abandon` command.

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

fn git(dir: &TempDir, args: &[&str]) {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir.path())
        .env("GIT_AUTHOR_NAME", "t")
        .env("GIT_AUTHOR_EMAIL", "t@t")
        .env("GIT_COMMITTER_NAME", "t")
        .env("GIT_COMMITTER_EMAIL", "t@t")
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
}

fn git_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(&temp, &["init", "-b", "main"]);
    git(&temp, &["commit", "--allow-empty", "-m", "init"]);
    temp
}

#[test]
fn abandoning_the_trunk_is_refused() {
    let temp = git_repo();
    tug()
        .arg("abandon")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot abandon the trunk branch"));
}

#[test]
fn abandoning_the_current_branch_is_refused() {
    let temp = git_repo();
    git(&temp, &["checkout", "-b", "feature"]);
    tug()
        .args(["abandon", "feature"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("it is the current branch"))
        .stderr(predicate::str::contains("tug vanilla"));
}

#[test]
fn abandoning_another_branch_moves_it_to_trash() {
    let temp = git_repo();
    git(&temp, &["branch", "feature"]);
    tug()
        .args(["abandon", "feature"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Moved your branch \"feature\" to \"trash/feature\".",
        ));

    let output = std::process::Command::new("git")
        .args(["branch", "--list", "trash/feature"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("trash/feature"));
}

#[test]
fn abandoning_a_ticket_without_a_branch_fails() {
    let temp = git_repo();
    tug()
        .args(["abandon", "7"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no local branch for this ticket"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for tests that need real git repositories.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;
use std::process::Command;
use std::rc::Rc;

use tempfile::TempDir;

use crate::git::Git;
use crate::prompt::ScriptedPrompt;
use crate::session::{Session, SessionConfig};
use crate::tracker::MemoryTracker;

/// Runs a git command in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@localhost")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@localhost")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

/// Writes `content` to `name` and commits it.
pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-m", message]);
}

/// A fresh repository on branch `main` with one initial commit.
pub fn scratch_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "-b", "main"]);
    commit_file(temp.path(), "README", "scratch\n", "initial commit");
    temp
}

/// Collaborator handles shared by a scratch session.
pub struct Harness {
    pub tracker: Rc<MemoryTracker>,
    pub prompt: Rc<ScriptedPrompt>,
}

/// Builds a session over `dir` with scripted prompt and in-memory tracker.
pub fn session_in(dir: &Path, username: &str) -> (Session, Harness) {
    let tracker = Rc::new(MemoryTracker::new());
    let prompt = Rc::new(ScriptedPrompt::new());
    let session = session_with(dir, username, &tracker, &prompt);
    (session, Harness { tracker, prompt })
}

/// Builds a session sharing existing tracker/prompt handles, for
/// multi-user scenarios against the same "server".
pub fn session_with(
    dir: &Path,
    username: &str,
    tracker: &Rc<MemoryTracker>,
    prompt: &Rc<ScriptedPrompt>,
) -> Session {
    let git = Git::open(dir, "origin").unwrap();
    let config = SessionConfig {
        username: username.to_string(),
        trunk: "main".to_string(),
    };
    Session::new(git, tracker.clone(), prompt.clone(), config).unwrap()
}

/// A scratch repository wired to a bare `origin` remote that already has
/// the trunk pushed.
pub fn scratch_repo_with_remote() -> (TempDir, TempDir) {
    let remote = TempDir::new().unwrap();
    git(remote.path(), &["init", "--bare", "-b", "main"]);
    let repo = scratch_repo();
    let url = remote.path().to_string_lossy().to_string();
    git(repo.path(), &["remote", "add", "origin", &url]);
    git(repo.path(), &["push", "origin", "main"]);
    (repo, remote)
}

/// Clones `remote` into a second working copy on `main`.
pub fn clone_repo(remote: &Path) -> TempDir {
    let temp = TempDir::new().unwrap();
    let url = remote.to_string_lossy().to_string();
    git(temp.path(), &["init", "-b", "main"]);
    git(temp.path(), &["remote", "add", "origin", &url]);
    git(temp.path(), &["fetch", "origin", "main"]);
    git(temp.path(), &["reset", "--hard", "FETCH_HEAD"]);
    temp
}

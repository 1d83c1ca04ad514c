// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The version-control backend.
//!
//! A thin handle over the `git` binary exposing only the primitive
//! operations the engine consumes. Failures carry the backend's own
//! diagnostic text verbatim so the user sees what git saw.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Handle to a git working copy and its configured remote.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
    git_dir: PathBuf,
    remote: String,
}

impl Git {
    /// Opens the repository containing `dir`.
    ///
    /// `remote` is the remote name (or URL) used for all fetch/push/ls-remote
    /// operations.
    pub fn open(dir: &Path, remote: &str) -> Result<Self> {
        let root = run_in(dir, &["rev-parse", "--show-toplevel"])?;
        let root = PathBuf::from(root);
        let git_dir = run_in(&root, &["rev-parse", "--git-dir"])?;
        let git_dir = if Path::new(&git_dir).is_absolute() {
            PathBuf::from(git_dir)
        } else {
            root.join(git_dir)
        };
        Ok(Git {
            root,
            git_dir,
            remote: remote.to_string(),
        })
    }

    /// Root of the working tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The repository's private metadata directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The remote all network operations talk to.
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// The current branch, or `None` in detached HEAD state.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let output = self.output(&["symbolic-ref", "--short", "-q", "HEAD"])?;
        if output.status.success() {
            Ok(Some(stdout_trimmed(&output)))
        } else {
            Ok(None)
        }
    }

    /// The commit hash a ref resolves to.
    pub fn commit_for(&self, reference: &str) -> Result<String> {
        self.run(&["rev-parse", "--verify", &format!("{reference}^{{commit}}")])
    }

    /// Creates branch `name` at `start`.
    pub fn branch(&self, name: &str, start: &str) -> Result<()> {
        self.run(&["branch", name, start]).map(drop)
    }

    /// Deletes branch `name`.
    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name]).map(drop)
    }

    /// Renames branch `old` to `new`.
    pub fn rename_branch(&self, old: &str, new: &str) -> Result<()> {
        self.run(&["branch", "-m", old, new]).map(drop)
    }

    /// Checks out `reference`, optionally detaching HEAD.
    pub fn checkout(&self, reference: &str, detach: bool) -> Result<()> {
        if detach {
            self.run(&["checkout", "--detach", reference]).map(drop)
        } else {
            self.run(&["checkout", reference]).map(drop)
        }
    }

    /// Records a commit of the staged and tracked changes.
    pub fn commit(&self, message: &str, amend: bool) -> Result<()> {
        if amend {
            self.run(&["commit", "-a", "--amend", "-m", message]).map(drop)
        } else {
            self.run(&["commit", "-a", "-m", message]).map(drop)
        }
    }

    /// Commits a resolved merge using the prepared merge message.
    pub fn commit_merge_resolution(&self) -> Result<()> {
        self.run(&["commit", "-a", "--no-edit"]).map(drop)
    }

    /// Fetches `reference` from the configured remote into `FETCH_HEAD`.
    pub fn fetch(&self, reference: &str) -> Result<()> {
        self.run(&["fetch", &self.remote, reference]).map(drop)
    }

    /// Merges `reference` into the current branch.
    pub fn merge(&self, reference: &str) -> Result<()> {
        self.run(&["merge", reference]).map(drop)
    }

    /// Aborts an in-progress merge, falling back to a hard reset.
    pub fn merge_abort(&self) -> Result<()> {
        if self.run(&["merge", "--abort"]).is_err() {
            self.reset_hard("HEAD")?;
        }
        Ok(())
    }

    /// The merge base of `a` and `b`.
    pub fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        self.run(&["merge-base", a, b])
    }

    /// Whether `ancestor` is an ancestor of (or equal to) `descendant`.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool> {
        let output = self.output(&["merge-base", "--is-ancestor", ancestor, descendant])?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(backend_error(&["merge-base"], &output)),
        }
    }

    /// Tracked files with uncommitted changes (staged or not).
    ///
    /// Untracked files are not listed; they only matter when a checkout
    /// would overwrite them, and git reports that itself.
    pub fn changed_files(&self) -> Result<Vec<String>> {
        // Status columns are positional, so the output must not be trimmed.
        let listing = self.run_raw(&["status", "--porcelain"])?;
        Ok(listing
            .lines()
            .filter(|line| line.len() > 3 && !line.starts_with('?'))
            .map(|line| line.chars().skip(3).collect())
            .collect())
    }

    /// Untracked files in the working tree.
    pub fn untracked_files(&self) -> Result<Vec<String>> {
        let listing = self.run_raw(&["status", "--porcelain"])?;
        Ok(listing
            .lines()
            .filter(|line| line.len() > 3 && line.starts_with('?'))
            .map(|line| line.chars().skip(3).collect())
            .collect())
    }

    /// Whether a merge is in progress.
    pub fn merge_in_progress(&self) -> Result<bool> {
        Ok(self.git_dir.join("MERGE_HEAD").exists()
            || self.git_dir.join("CHERRY_PICK_HEAD").exists())
    }

    /// Commit subjects in `range`, rendered with `format` (git pretty
    /// placeholders), newest first.
    pub fn log(&self, range: &str, format: &str) -> Result<Vec<String>> {
        let pretty = format!("--pretty={format}");
        let listing = self.run(&["log", &pretty, range])?;
        Ok(listing.lines().map(str::to_string).collect())
    }

    /// Local branch names.
    pub fn local_branches(&self) -> Result<Vec<String>> {
        let listing = self.run(&[
            "for-each-ref",
            "--format=%(refname:short)",
            "refs/heads",
        ])?;
        Ok(listing.lines().map(str::to_string).collect())
    }

    /// Whether a local branch exists.
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let output = self.output(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{name}"),
        ])?;
        Ok(output.status.success())
    }

    /// Whether `name` exists as a branch on the configured remote.
    ///
    /// Always asks the remote; cached remote-tracking refs are never
    /// trusted for divergence decisions.
    pub fn remote_branch_exists(&self, name: &str) -> Result<bool> {
        let output = self.output(&[
            "ls-remote",
            "--exit-code",
            "--heads",
            &self.remote,
            &format!("refs/heads/{name}"),
        ])?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(2) => Ok(false),
            _ => Err(backend_error(&["ls-remote"], &output)),
        }
    }

    /// Pushes `refspec` to the configured remote.
    pub fn push(&self, refspec: &str, force: bool) -> Result<()> {
        if force {
            self.run(&["push", "--force", &self.remote, refspec]).map(drop)
        } else {
            self.run(&["push", &self.remote, refspec]).map(drop)
        }
    }

    /// The working tree's diff against `base`.
    pub fn diff(&self, base: &str) -> Result<String> {
        self.run_raw(&["diff", base])
    }

    /// Moves uncommitted changes to the stash stack.
    pub fn stash(&self) -> Result<()> {
        self.run(&["stash", "--include-untracked"]).map(drop)
    }

    /// Hard-resets the working tree and index to `reference`.
    pub fn reset_hard(&self, reference: &str) -> Result<()> {
        self.run(&["reset", "--hard", reference]).map(drop)
    }

    /// Removes untracked files and directories.
    pub fn clean_untracked(&self) -> Result<()> {
        self.run(&["clean", "-fd"]).map(drop)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(stdout_trimmed(&output))
        } else {
            Err(backend_error(args, &output))
        }
    }

    fn run_raw(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(backend_error(args, &output))
        }
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output> {
        tracing::debug!(?args, "git");
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.root)
            .args(args)
            .stdin(Stdio::null());
        setup_git_env(&mut cmd);
        cmd.output().map_err(Error::Io)
    }
}

/// Sets default git author/committer environment variables.
/// This ensures git commands work even when no user is configured
/// (e.g. in CI environments or when HOME points to an empty directory).
fn setup_git_env(cmd: &mut Command) {
    for (name, value) in [
        ("GIT_AUTHOR_NAME", "tug"),
        ("GIT_AUTHOR_EMAIL", "tug@localhost"),
        ("GIT_COMMITTER_NAME", "tug"),
        ("GIT_COMMITTER_EMAIL", "tug@localhost"),
    ] {
        if std::env::var(name).map(|v| v.is_empty()).unwrap_or(true) {
            cmd.env(name, value);
        }
    }
    // Merge commits take the auto-generated message; the conflict loop has
    // its own confirmation step.
    cmd.env("GIT_MERGE_AUTOEDIT", "no");
}

fn stdout_trimmed(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn backend_error(args: &[&str], output: &std::process::Output) -> Error {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut detail = String::new();
    if !stdout.trim().is_empty() {
        detail.push_str(stdout.trim());
    }
    if !stderr.trim().is_empty() {
        if !detail.is_empty() {
            detail.push('\n');
        }
        detail.push_str(stderr.trim());
    }
    Error::Backend {
        op: args.first().copied().unwrap_or("git").to_string(),
        detail,
    }
}

fn run_in(dir: &Path, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir).args(args).stdin(Stdio::null());
    let output = cmd.output().map_err(Error::Io)?;
    if output.status.success() {
        Ok(stdout_trimmed(&output))
    } else {
        Err(backend_error(args, &output))
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;

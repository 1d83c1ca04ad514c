// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tug-core operations.

use thiserror::Error;

/// All possible errors that can occur in tug-core operations.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid ticket name: '{0}'\n  hint: ticket names look like 123, #123 or ticket/123")]
    InvalidTicketName(String),

    #[error("ticket #{0} does not exist on the tracker")]
    NoSuchTicket(u64),

    #[error("invalid branch name: '{0}'")]
    InvalidBranchName(String),

    #[error("invalid name for a remote branch: '{0}'")]
    InvalidRemoteBranchName(String),

    #[error("branch '{0}' does not exist locally\n  hint: use 'tug tickets' to list local branches")]
    NoSuchLocalBranch(String),

    #[error("branch '{0}' does not exist on the remote repository")]
    NoSuchRemoteBranch(String),

    #[error("'{0}' does not exist locally or on the remote repository")]
    NoSuchRef(String),

    #[error("branch '{0}' already exists, use a different name")]
    BranchAlreadyExists(String),

    #[error("the branch field of ticket #{0} is not set on the tracker")]
    UnsetBranchField(u64),

    #[error("no base specified and not currently on a ticket")]
    NoBaseSpecified,

    #[error("cannot abandon #{0}: no local branch for this ticket")]
    NoLocalBranchForTicket(u64),

    #[error("working tree has uncommitted changes\n  hint: use 'tug commit' to save them in a new commit")]
    DirtyWorkingTree,

    #[error("repository is in the middle of a merge\n  hint: resolve the merge or reset the working tree first")]
    UnmergedState,

    #[error("not currently on any branch")]
    DetachedHead,

    #[error("'{ours}' and '{theirs}' have diverged\n  hint: use 'tug pull' to merge the remote changes, or rerun with --force to overwrite them")]
    Diverged { ours: String, theirs: String },

    #[error("branch field of ticket #{ticket} changed upstream: expected '{expected}', found '{actual}'\n  hint: use 'tug pull' and push again")]
    BranchFieldRace {
        ticket: u64,
        expected: String,
        actual: String,
    },

    #[error("operation cancelled: {0}")]
    Cancelled(&'static str),

    #[error("a ticket cannot depend on itself")]
    SelfDependency,

    #[error("cannot merge a ticket into itself")]
    SelfMerge,

    #[error("cannot delete '{0}': it is the current branch\n  hint: use 'tug vanilla' to switch to a detached trunk first")]
    CurrentBranch(String),

    #[error("cannot abandon the trunk branch '{0}'")]
    ProtectedBranch(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("git {op} failed: {detail}")]
    Backend { op: String, detail: String },

    #[error("tracker request failed: {0}")]
    Rpc(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tug-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The working-tree guard.
//!
//! Every operation that switches branches or merges first drives the
//! working tree to a clean state through these helpers. The user resolves
//! dirty or mid-merge conditions interactively; a declined resolution is
//! returned as [`Outcome::Cancelled`] rather than raised, and only becomes
//! an error when the caller required cleanliness.

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::prompt::Prompt;
use crate::session::Session;

/// Observed state of the working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingState {
    /// No uncommitted changes, on a named branch.
    Clean,
    /// Tracked changes and/or untracked files present.
    Dirty(Vec<String>),
    /// The backend's mid-merge marker is present.
    Merging,
    /// Not on any named branch.
    Detached,
}

impl Session {
    /// Classifies the current working-copy state.
    pub fn working_state(&self) -> Result<WorkingState> {
        if self.git.merge_in_progress()? {
            return Ok(WorkingState::Merging);
        }
        let changed = self.git.changed_files()?;
        if !changed.is_empty() {
            return Ok(WorkingState::Dirty(changed));
        }
        if self.git.current_branch()?.is_none() {
            return Ok(WorkingState::Detached);
        }
        Ok(WorkingState::Clean)
    }

    /// Resolves a mid-merge state by offering `{reset, cancel}`.
    ///
    /// `reset` discards the in-progress merge together with any uncommitted
    /// changes. With `error_unless_clean`, a declined reset fails with
    /// [`Error::UnmergedState`]; otherwise it is returned as
    /// [`Outcome::Cancelled`] and the repository is left untouched.
    pub fn reset_to_clean_state(&mut self, error_unless_clean: bool) -> Result<Outcome> {
        if !self.git.merge_in_progress()? {
            return Ok(Outcome::Proceed);
        }
        self.prompt.show(
            "Repository is in an unclean state (merge). Resetting the state will \
             discard any uncommitted changes.",
        );
        let sel = self
            .prompt
            .select("Reset repository?", &["reset", "cancel"], 1)?;
        if sel == "reset" {
            self.git.merge_abort()?;
            self.git.reset_hard("HEAD")?;
            tracing::debug!("merge state reset");
            return Ok(Outcome::Proceed);
        }
        if error_unless_clean {
            return Err(Error::UnmergedState);
        }
        Ok(Outcome::Cancelled)
    }

    /// Resolves uncommitted changes by offering `{discard, cancel|keep,
    /// stash}`.
    ///
    /// `discard` hard-resets tracked changes and removes untracked files;
    /// `stash` moves everything to the stash stack and proceeds. A declined
    /// clean fails with [`Error::DirtyWorkingTree`] when `error_unless_clean`
    /// is set; otherwise the middle option reads `keep` and the decline is
    /// returned as [`Outcome::Cancelled`] with the files untouched.
    pub fn clean(&mut self, error_unless_clean: bool) -> Result<Outcome> {
        let outcome = self.reset_to_clean_state(error_unless_clean)?;
        if outcome.cancelled() {
            return Ok(outcome);
        }

        let files = self.git.changed_files()?;
        if files.is_empty() {
            return Ok(Outcome::Proceed);
        }

        let mut listing = String::from(
            "The following files in your working directory contain uncommitted changes:\n\n",
        );
        for file in &files {
            listing.push_str("    ");
            listing.push_str(file);
            listing.push('\n');
        }
        self.prompt.show(&listing);

        let middle = if error_unless_clean { "cancel" } else { "keep" };
        let sel = self
            .prompt
            .select("Discard changes?", &["discard", middle, "stash"], 1)?;
        match sel.as_str() {
            "discard" => {
                self.git.reset_hard("HEAD")?;
                self.git.clean_untracked()?;
                Ok(Outcome::Proceed)
            }
            "stash" => {
                self.git.stash()?;
                self.prompt.show(
                    "Your changes have been moved to the git stash stack. To re-apply \
                     them later use \"git stash apply\".",
                );
                Ok(Outcome::Proceed)
            }
            _ => {
                if error_unless_clean {
                    return Err(Error::DirtyWorkingTree);
                }
                Ok(Outcome::Cancelled)
            }
        }
    }

    /// Drives the guard to a clean state, failing when the user declines.
    pub(crate) fn require_clean(&mut self) -> Result<()> {
        self.reset_to_clean_state(true)?;
        self.clean(true)?;
        Ok(())
    }

    /// Switches the working tree to `branch` behind the guard.
    ///
    /// When the target commit equals the current commit, locally modified
    /// tracked files may be kept across the switch; otherwise a full clean
    /// is mandatory.
    pub(crate) fn switch_branch(&mut self, branch: &str) -> Result<()> {
        self.reset_to_clean_state(true)?;
        let current = self.git.commit_for("HEAD")?;
        let target = self.git.commit_for(branch)?;
        self.clean(current != target)?;
        self.git.checkout(branch, false)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The session context.
//!
//! One `Session` is constructed at process start and threaded through every
//! operation: it owns the git handle, the registry, and the tracker and
//! prompt capabilities. There are no ambient singletons.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::git::Git;
use crate::names;
use crate::prompt::Prompt;
use crate::registry::Registry;
use crate::ticket::TicketId;
use crate::tracker::Tracker;

/// Per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Username scoping default remote branch names (`u/<username>/...`).
    pub username: String,
    /// The repository's mainline branch.
    pub trunk: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            username: "dev".to_string(),
            trunk: "main".to_string(),
        }
    }
}

/// Existence requirement for a name check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The name must refer to an existing branch.
    Required,
    /// The name must not refer to an existing branch.
    Absent,
    /// Only the syntax is checked.
    Any,
}

/// A recoverable-but-suspicious condition observed during an operation.
///
/// These do not fail the operation; they are recorded so that callers (and
/// tests) can see that self-healing happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A ticket referenced a local branch that no longer exists; the link
    /// was cleared.
    DanglingBranchLink { ticket: TicketId, branch: String },
}

/// The context object owning all collaborator handles.
pub struct Session {
    pub(crate) git: Git,
    pub(crate) registry: Registry,
    pub(crate) tracker: Rc<dyn Tracker>,
    pub(crate) prompt: Rc<dyn Prompt>,
    pub(crate) config: SessionConfig,
    pub(crate) anomalies: Vec<Anomaly>,
}

impl Session {
    /// Builds a session for the repository `git` points at, opening (or
    /// creating) the registry inside its metadata directory.
    pub fn new(
        git: Git,
        tracker: Rc<dyn Tracker>,
        prompt: Rc<dyn Prompt>,
        config: SessionConfig,
    ) -> Result<Self> {
        let registry = Registry::open(git.git_dir(), git.root())?;
        Ok(Session {
            git,
            registry,
            tracker,
            prompt,
            config,
            anomalies: Vec::new(),
        })
    }

    pub fn git(&self) -> &Git {
        &self.git
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The prompt capability this session talks to the user through.
    pub fn prompt(&self) -> &dyn Prompt {
        self.prompt.as_ref()
    }

    /// Anomalies observed so far in this session.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// The ticket bound to the currently checked-out branch.
    pub fn current_ticket(&self) -> Result<Option<TicketId>> {
        Ok(match self.git.current_branch()? {
            Some(branch) => self.registry.ticket_for_branch(&branch),
            None => None,
        })
    }

    /// Parses a ticket reference, optionally requiring it to exist on the
    /// tracker.
    pub fn ticket_from_name(&self, name: &str, must_exist: bool) -> Result<TicketId> {
        let ticket = names::ticket_from_name(name)?;
        if must_exist && !self.tracker.exists(ticket)? {
            return Err(Error::NoSuchTicket(ticket.get()));
        }
        Ok(ticket)
    }

    /// Validates a local branch name against the reference grammar and the
    /// requested existence requirement.
    pub fn check_local_branch(&self, name: &str, presence: Presence) -> Result<()> {
        if !names::is_local_branch_name(name) {
            return Err(Error::InvalidBranchName(name.to_string()));
        }
        match presence {
            Presence::Required if !self.git.branch_exists(name)? => {
                Err(Error::NoSuchLocalBranch(name.to_string()))
            }
            Presence::Absent if self.git.branch_exists(name)? => {
                Err(Error::BranchAlreadyExists(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Validates a remote branch name, asking the remote when an existence
    /// requirement is given.
    pub fn check_remote_branch(&self, name: &str, presence: Presence) -> Result<()> {
        if !names::is_remote_branch_name(name) {
            return Err(Error::InvalidRemoteBranchName(name.to_string()));
        }
        match presence {
            Presence::Required if !self.git.remote_branch_exists(name)? => {
                Err(Error::NoSuchRemoteBranch(name.to_string()))
            }
            Presence::Absent if self.git.remote_branch_exists(name)? => {
                Err(Error::BranchAlreadyExists(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The local branch for `ticket`.
    ///
    /// A link pointing at a branch that no longer exists is cleared (the
    /// condition is recorded as [`Anomaly::DanglingBranchLink`]). With
    /// `pull_if_missing`, the branch declared on the tracker is fetched and
    /// a fresh local branch is created and bound.
    pub fn local_branch_for_ticket(
        &mut self,
        ticket: TicketId,
        pull_if_missing: bool,
    ) -> Result<Option<String>> {
        if let Some(branch) = self.registry.branch_for_ticket(ticket).map(str::to_string) {
            if self.git.branch_exists(&branch)? {
                return Ok(Some(branch));
            }
            tracing::warn!(%ticket, %branch, "clearing dangling branch link");
            self.prompt.show(&format!(
                "Ticket #{ticket} refers to the non-existent local branch \"{branch}\". \
                 Removing the association."
            ));
            self.registry.unbind(ticket)?;
            self.anomalies
                .push(Anomaly::DanglingBranchLink { ticket, branch });
        }
        if !pull_if_missing {
            return Ok(None);
        }

        let remote = self
            .tracker
            .branch_field(ticket)?
            .ok_or(Error::UnsetBranchField(ticket.get()))?;
        if !self.git.remote_branch_exists(&remote)? {
            return Err(Error::NoSuchRemoteBranch(remote));
        }
        self.git.fetch(&remote)?;
        let mut branch = names::ticket_branch_name(ticket);
        while self.git.branch_exists(&branch)? {
            branch.push('_');
        }
        self.git.branch(&branch, "FETCH_HEAD")?;
        self.registry.bind(ticket, &branch)?;
        Ok(Some(branch))
    }

    /// The remote branch to push `ticket`'s work to: the recorded push
    /// target of its local branch, or the user-scoped default.
    pub fn remote_branch_for_ticket(&self, ticket: TicketId) -> String {
        if let Some(branch) = self.registry.branch_for_ticket(ticket) {
            if let Some(remote) = self.registry.remote_branch_for(branch) {
                return remote.to_string();
            }
        }
        names::user_branch_name(&self.config.username, &names::ticket_branch_name(ticket))
    }

    /// A trash name for `branch` that does not collide with any existing
    /// branch.
    pub fn trash_branch_name(&self, branch: &str) -> Result<String> {
        let mut name = branch.to_string();
        loop {
            let candidate = format!("{}{}", names::TRASH_PREFIX, name);
            if !self.git.branch_exists(&candidate)? {
                return Ok(candidate);
            }
            name.push('_');
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The checkout engine.
//!
//! Resolves a ticket or branch name to a concrete local branch, creating
//! one from a base revision when necessary, and records the resulting
//! ticket↔branch association together with its initial dependencies.
//! Branch creation is transactional: any failure deletes the partially
//! created branch before the error propagates.

use crate::error::{Error, Result};
use crate::names;
use crate::prompt::Prompt;
use crate::session::{Presence, Session};
use crate::ticket::{TicketAttributes, TicketId};
use crate::tracker::Tracker;

/// Base revision for a newly created ticket branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaseSpec {
    /// The trunk branch, unless the ticket's remote-declared branch is set
    /// (then that branch is fetched and used).
    #[default]
    Unspecified,
    /// The ticket currently checked out.
    CurrentTicket,
    /// An explicit ticket reference or local branch name.
    Name(String),
}

/// One row of the local ticket/branch listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketListEntry {
    pub branch: String,
    pub ticket: Option<TicketId>,
    pub summary: String,
    pub current: bool,
}

impl Session {
    /// Checks out a ticket and/or branch.
    ///
    /// With both given, an existing `branch` is bound to `ticket` first.
    /// With only a ticket, its bound branch is reused or a new one created
    /// from `base`. With only a branch, it is simply checked out (and
    /// `base` must be unspecified).
    pub fn checkout(
        &mut self,
        ticket: Option<&str>,
        branch: Option<&str>,
        base: BaseSpec,
    ) -> Result<()> {
        match (ticket, branch) {
            (Some(ticket), branch) => self.checkout_ticket(ticket, branch, base)?,
            (None, Some(branch)) => {
                if base != BaseSpec::Unspecified {
                    return Err(Error::InvalidInput(
                        "base must not be specified if no ticket is specified".to_string(),
                    ));
                }
                self.checkout_branch(branch)?;
            }
            (None, None) => {
                return Err(Error::InvalidInput(
                    "at least one of ticket or branch must be specified".to_string(),
                ))
            }
        }

        let branch = self.git.current_branch()?.ok_or(Error::DetachedHead)?;
        match self.registry.ticket_for_branch(&branch) {
            Some(ticket) => self.prompt.show(&format!(
                "On ticket #{ticket} with associated local branch \"{branch}\"."
            )),
            None => self.prompt.show(&format!(
                "On local branch \"{branch}\" without associated ticket."
            )),
        }
        Ok(())
    }

    /// Checks out the branch associated to `ticket`, creating it if needed.
    pub fn checkout_ticket(
        &mut self,
        ticket_name: &str,
        branch: Option<&str>,
        base: BaseSpec,
    ) -> Result<()> {
        let ticket = self.ticket_from_name(ticket_name, true)?;

        // An existing local branch becomes the ticket's branch.
        if let Some(existing) = branch {
            if self.git.branch_exists(existing)? {
                if base != BaseSpec::Unspecified {
                    return Err(Error::InvalidInput(
                        "base must not be specified if branch is an existing branch"
                            .to_string(),
                    ));
                }
                if existing == self.config.trunk {
                    return Err(Error::InvalidInput(
                        "branch must not be the trunk branch".to_string(),
                    ));
                }
                self.check_local_branch(existing, Presence::Any)?;
                self.registry.bind(ticket, existing)?;
                tracing::debug!(%ticket, branch = existing, "bound existing branch");
                return self.checkout_branch(existing);
            }
        }

        // Reuse the branch already bound to this ticket.
        if branch.is_none() {
            if let Some(bound) = self.local_branch_for_ticket(ticket, false)? {
                return self.checkout_branch(&bound);
            }
        }

        let branch_name = match branch {
            Some(name) => name.to_string(),
            None => names::ticket_branch_name(ticket),
        };
        self.check_local_branch(&branch_name, Presence::Absent)?;

        // The tracker's dependency list seeds the local one, unless the
        // base is itself a ticket, which then becomes the sole dependency.
        let mut dependencies = self.tracker.dependencies(ticket)?;
        let explicit_base = match base {
            BaseSpec::Unspecified => None,
            BaseSpec::CurrentTicket => {
                let current = self.current_ticket()?.ok_or(Error::NoBaseSpecified)?;
                Some(current.to_string())
            }
            BaseSpec::Name(name) => Some(name),
        };
        let base_branch = match explicit_base {
            None => None,
            Some(name) if names::is_ticket_name(&name) => {
                let base_ticket = self.ticket_from_name(&name, true)?;
                if base_ticket == ticket {
                    return Err(Error::SelfDependency);
                }
                dependencies = vec![base_ticket];
                let Some(local) = self.local_branch_for_ticket(base_ticket, true)? else {
                    return Err(Error::NoLocalBranchForTicket(base_ticket.get()));
                };
                Some(local)
            }
            Some(name) => {
                self.check_local_branch(&name, Presence::Required)?;
                Some(name)
            }
        };

        let remote_field = self.tracker.branch_field(ticket)?;
        if let Err(e) = self.create_ticket_branch(
            ticket,
            &branch_name,
            base_branch.as_deref(),
            remote_field.as_deref(),
        ) {
            if self.git.branch_exists(&branch_name)? {
                tracing::debug!(branch = %branch_name, "rolling back partially created branch");
                self.git.delete_branch(&branch_name, true)?;
            }
            return Err(e);
        }

        self.registry.bind(ticket, &branch_name)?;
        if !dependencies.is_empty() {
            tracing::debug!(%ticket, ?dependencies, "recording initial dependencies");
            self.set_dependencies(ticket, Some(dependencies))?;
        }
        let remote_target = self.remote_branch_for_ticket(ticket);
        self.registry.set_remote_branch(&branch_name, &remote_target)?;
        self.checkout_branch(&branch_name)
    }

    /// Switches to the local branch `branch` behind the working-tree guard.
    pub fn checkout_branch(&mut self, branch: &str) -> Result<()> {
        self.check_local_branch(branch, Presence::Required)?;
        self.switch_branch(branch)
    }

    fn create_ticket_branch(
        &mut self,
        ticket: TicketId,
        branch: &str,
        base: Option<&str>,
        remote_field: Option<&str>,
    ) -> Result<()> {
        match base {
            None => {
                if let Some(remote) = remote_field {
                    if !self.git.remote_branch_exists(remote)? {
                        self.prompt.show(&format!(
                            "The branch field of ticket #{ticket} is set to \"{remote}\" \
                             which does not exist on the remote repository. Fix the field \
                             on the tracker first."
                        ));
                        return Err(Error::NoSuchRemoteBranch(remote.to_string()));
                    }
                    self.git.fetch(remote)?;
                    self.git.branch(branch, "FETCH_HEAD")?;
                } else {
                    tracing::debug!(%ticket, branch, trunk = %self.config.trunk, "branching off the trunk");
                    if !self.git.branch_exists(&self.config.trunk)? {
                        return Err(Error::NoSuchLocalBranch(self.config.trunk.clone()));
                    }
                    self.git.branch(branch, &self.config.trunk)?;
                }
            }
            Some(base) => {
                if let Some(remote) = remote_field {
                    self.prompt.show(&format!(
                        "About to create a new branch for #{ticket} based on \"{base}\". \
                         However, the ticket already refers to the branch \"{remote}\". \
                         The new branch will not contain any work that has already been \
                         done on \"{remote}\"."
                    ));
                    if !self.prompt.confirm("Create fresh branch?", false)? {
                        return Err(Error::Cancelled("keeping the existing remote branch"));
                    }
                }
                self.git.branch(branch, base)?;
            }
        }
        Ok(())
    }

    /// Abandons a ticket or branch: the branch moves to a fresh `trash/`
    /// name and the ticket keeps existing on the tracker with no local
    /// binding.
    pub fn abandon(&mut self, ticket_or_branch: Option<&str>) -> Result<()> {
        let target = match ticket_or_branch {
            Some(target) => target.to_string(),
            None => self.git.current_branch()?.ok_or(Error::DetachedHead)?,
        };
        let (ticket, branch) = if names::is_ticket_name(&target) {
            let ticket = self.ticket_from_name(&target, false)?;
            let branch = self
                .registry
                .branch_for_ticket(ticket)
                .map(str::to_string)
                .ok_or(Error::NoLocalBranchForTicket(ticket.get()))?;
            (Some(ticket), branch)
        } else {
            let ticket = self.registry.ticket_for_branch(&target);
            (ticket, target)
        };
        self.check_local_branch(&branch, Presence::Required)?;
        if branch == self.config.trunk {
            return Err(Error::ProtectedBranch(branch));
        }
        if self.git.current_branch()?.as_deref() == Some(branch.as_str()) {
            return Err(Error::CurrentBranch(branch));
        }

        let trash = self.trash_branch_name(&branch)?;
        self.git.rename_branch(&branch, &trash)?;
        self.prompt
            .show(&format!("Moved your branch \"{branch}\" to \"{trash}\"."));
        if let Some(ticket) = ticket {
            self.registry.unbind(ticket)?;
            self.registry.set_dependencies(ticket, None)?;
            self.prompt.show(&format!(
                "(use \"tug checkout --ticket {ticket}\" to start over on #{ticket})"
            ));
        }
        self.registry.clear_remote_branch(&branch)?;
        Ok(())
    }

    /// Abandons every ticket branch already merged into the trunk.
    pub fn prune(&mut self) -> Result<()> {
        if !self.git.branch_exists(&self.config.trunk)? {
            return Err(Error::NoSuchLocalBranch(self.config.trunk.clone()));
        }
        let current = self.git.current_branch()?;
        for branch in self.git.local_branches()? {
            let Some(ticket) = self.registry.ticket_for_branch(&branch) else {
                continue;
            };
            if !self.git.is_ancestor(&branch, &self.config.trunk)? {
                continue;
            }
            if current.as_deref() == Some(branch.as_str()) {
                self.prompt.show(&format!(
                    "Cannot abandon \"{branch}\": it is the current branch."
                ));
                continue;
            }
            self.prompt.show(&format!("Abandoning #{ticket}."));
            self.abandon(Some(&branch))?;
        }
        Ok(())
    }

    /// Checks out a plain copy of `release` (any tag, branch or commit),
    /// detached, fetching it from the remote when unknown locally.
    pub fn vanilla(&mut self, release: &str) -> Result<()> {
        self.require_clean()?;
        if self.git.checkout(release, true).is_ok() {
            return Ok(());
        }
        if self.git.fetch(release).is_err() {
            return Err(Error::NoSuchRef(release.to_string()));
        }
        self.git.checkout("FETCH_HEAD", true)
    }

    /// Lists local branches with their bound tickets and summaries.
    ///
    /// Tracker lookups degrade to an empty summary when the service is
    /// unreachable.
    pub fn ticket_list(&mut self, include_abandoned: bool) -> Result<Vec<TicketListEntry>> {
        let current = self.git.current_branch()?;
        let mut entries = Vec::new();
        for branch in self.git.local_branches()? {
            if !include_abandoned && names::is_trash_name(&branch) {
                continue;
            }
            let ticket = self.registry.ticket_for_branch(&branch);
            let summary = match ticket {
                Some(ticket) => self
                    .tracker
                    .get_attributes(ticket)
                    .map(|attributes| attributes.summary)
                    .unwrap_or_default(),
                None => String::new(),
            };
            entries.push(TicketListEntry {
                current: current.as_deref() == Some(branch.as_str()),
                branch,
                ticket,
                summary,
            });
        }
        Ok(entries)
    }

    /// Creates a ticket on the tracker and prints the checkout hint.
    pub fn create_ticket(&mut self, attributes: &TicketAttributes) -> Result<TicketId> {
        let ticket = self.tracker.create_ticket(attributes)?;
        self.prompt.show(&format!("Created ticket #{ticket}."));
        self.prompt.show(&format!(
            "(use \"tug checkout --ticket {ticket}\" to create a new local branch)"
        ));
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "checkout_tests.rs"]
mod tests;

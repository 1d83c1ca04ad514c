// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: push, pull, merge and the status summary.
//!
//! The shared resources at this level are the remote branch and the
//! ticket's branch field and dependency list. Multiple users push
//! concurrently, so no comparison ever trusts cached remote state: every
//! decision re-fetches first and recomputes from current ancestry.

use crate::error::{Error, Result};
use crate::names;
use crate::prompt::Prompt;
use crate::session::{Presence, Session};
use crate::ticket::TicketId;
use crate::tracker::Tracker;

/// How the local branch relates to a remote counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRelation {
    Identical,
    /// The local branch has this many commits the other lacks.
    Ahead(usize),
    /// The other branch has this many commits the local one lacks.
    Behind(usize),
    Diverged { ahead: usize, behind: usize },
}

/// Comparison of the local branch against one remote branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComparison {
    pub name: String,
    /// Commits between the trunk merge-base and this branch's head.
    pub commits_from_trunk: usize,
    /// `None` when the branches sit on different trunk versions and the
    /// counts cannot be compared meaningfully.
    pub relation: Option<BranchRelation>,
}

/// Status summary for a branch and its remote counterparts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStatus {
    pub branch: String,
    pub ticket: Option<TicketId>,
    pub commits_from_trunk: usize,
    /// The branch declared in the ticket's branch field, when set and
    /// present on the remote.
    pub ticket_branch: Option<RemoteComparison>,
    /// The branch's own recorded push target, when present on the remote.
    pub remote_branch: Option<RemoteComparison>,
}

impl Session {
    /// Fetches the ticket's (or an explicit remote branch's) current head
    /// and merges it into the current branch.
    pub fn pull(&mut self, ticket_or_remote_branch: Option<&str>) -> Result<()> {
        let target = match ticket_or_remote_branch {
            Some(target) => target.to_string(),
            None => self
                .current_ticket()?
                .ok_or_else(|| {
                    Error::InvalidInput(
                        "not currently on a ticket; specify a ticket or remote branch to pull"
                            .to_string(),
                    )
                })?
                .to_string(),
        };
        let remote = if names::is_ticket_name(&target) {
            let ticket = self.ticket_from_name(&target, true)?;
            self.tracker
                .branch_field(ticket)?
                .ok_or(Error::UnsetBranchField(ticket.get()))?
        } else {
            self.check_remote_branch(&target, Presence::Any)?;
            target
        };
        self.merge(&remote, Some(true), None)
    }

    /// Pushes the current branch to its remote counterpart and negotiates
    /// the ticket's branch field and dependency list.
    pub fn push(
        &mut self,
        ticket: Option<&str>,
        remote_branch: Option<&str>,
        force: bool,
    ) -> Result<()> {
        let branch = self.git.current_branch()?.ok_or(Error::DetachedHead)?;
        let ticket = match ticket {
            Some(name) => Some(self.ticket_from_name(name, true)?),
            None => self.registry.ticket_for_branch(&branch),
        };

        let remote_branch = match remote_branch {
            Some(name) => {
                self.check_remote_branch(name, Presence::Any)?;
                name.to_string()
            }
            None => match ticket {
                Some(ticket) => self.remote_branch_for_ticket(ticket),
                None => match self.registry.remote_branch_for(&branch) {
                    Some(remote) => remote.to_string(),
                    None => names::user_branch_name(&self.config.username, &branch),
                },
            },
        };

        if let Some(ticket) = ticket {
            self.confirm_cross_bindings(ticket, &branch, &remote_branch)?;
        }

        if remote_branch == self.config.trunk
            || names::user_scope(&remote_branch)
                .is_some_and(|user| user != self.config.username)
        {
            self.prompt.show(&format!(
                "The remote branch \"{remote_branch}\" is not in your user scope. You \
                 probably do not have permission to push to it; \"{}\" is always \
                 available.",
                names::user_branch_name(&self.config.username, &branch)
            ));
        }

        let remote_exists = self.git.remote_branch_exists(&remote_branch)?;
        if remote_exists {
            self.git.fetch(&remote_branch)?;
            if !force {
                if self.git.is_ancestor(&branch, "FETCH_HEAD")? {
                    self.prompt.show(&format!(
                        "Nothing to push: the remote branch \"{remote_branch}\" already \
                         contains your commits."
                    ));
                    return Ok(());
                }
                if !self.git.is_ancestor("FETCH_HEAD", &branch)? {
                    self.prompt.show(&format!(
                        "Not pushing your changes because they would discard some of the \
                         commits on the remote branch \"{remote_branch}\"."
                    ));
                    return Err(Error::Diverged {
                        ours: branch,
                        theirs: remote_branch,
                    });
                }
                let commits = self.git.log(&format!("FETCH_HEAD..{branch}"), "%h: %s")?;
                let mut listing = format!(
                    "Local commits that are not on the remote branch \"{remote_branch}\":\n\n"
                );
                for commit in &commits {
                    listing.push_str("    ");
                    listing.push_str(commit);
                    listing.push('\n');
                }
                self.prompt.show(&listing);
                if !self.prompt.confirm("Push to remote branch?", true)? {
                    return Err(Error::Cancelled("user requested"));
                }
            }
        } else {
            self.prompt.show(&format!(
                "The branch \"{remote_branch}\" does not exist on the remote repository."
            ));
            if !self.prompt.confirm("Create new remote branch?", true)? {
                return Err(Error::Cancelled("user requested"));
            }
        }

        self.git.push(&format!("{branch}:{remote_branch}"), force)?;
        tracing::debug!(%branch, %remote_branch, "pushed");
        self.registry.set_remote_branch(&branch, &remote_branch)?;

        if let Some(ticket) = ticket {
            self.negotiate_branch_field(ticket, &branch, &remote_branch, force)?;
            self.reconcile_dependencies_on_push(ticket)?;
        }
        Ok(())
    }

    // Pushing a branch for a ticket it is not bound to (or a branch bound
    // to another ticket) is legal but surprising; require confirmation.
    fn confirm_cross_bindings(
        &mut self,
        ticket: TicketId,
        branch: &str,
        remote_branch: &str,
    ) -> Result<()> {
        if let Some(bound) = self.registry.branch_for_ticket(ticket).map(str::to_string) {
            if bound != branch {
                self.prompt.show(&format!(
                    "About to push the branch \"{branch}\" to \"{remote_branch}\" for \
                     ticket #{ticket}. However, your local branch for ticket #{ticket} \
                     is \"{bound}\"."
                ));
                if !self.prompt.confirm("Do you really want to proceed?", false)? {
                    return Err(Error::Cancelled("user requested"));
                }
            }
        }
        if let Some(other) = self.registry.ticket_for_branch(branch) {
            if other != ticket {
                self.prompt.show(&format!(
                    "About to push the local branch \"{branch}\" to \"{remote_branch}\" \
                     for ticket #{ticket}. However, that branch is associated to ticket \
                     #{other}."
                ));
                if !self.prompt.confirm("Do you really want to proceed?", false)? {
                    return Err(Error::Cancelled("user requested"));
                }
            }
        }
        Ok(())
    }

    /// Updates the ticket's branch field after a successful push.
    ///
    /// The field is only overwritten when the pushed branch is a descendant
    /// of (or equal to) the field's current head: this is the
    /// optimistic-concurrency guard keeping two users from silently
    /// overwriting each other's pointer. The final write goes through the
    /// tracker's compare-and-swap, so a race after our fetch still fails
    /// cleanly.
    fn negotiate_branch_field(
        &mut self,
        ticket: TicketId,
        branch: &str,
        remote_branch: &str,
        force: bool,
    ) -> Result<()> {
        let Some(field) = self.tracker.branch_field(ticket)? else {
            tracing::debug!(%ticket, %remote_branch, "setting unset branch field");
            return self.tracker.set_branch_field(ticket, remote_branch, None);
        };
        if field == remote_branch {
            tracing::debug!(%ticket, "branch field already up to date");
            return Ok(());
        }

        let mut descends = force;
        if !descends {
            if self.git.remote_branch_exists(&field)? {
                self.git.fetch(&field)?;
                descends = self.git.is_ancestor("FETCH_HEAD", branch)?;
            } else {
                // The field points at a branch that no longer exists; there
                // is no history to lose.
                descends = true;
            }
        }
        if !descends {
            self.prompt.show(&format!(
                "Not setting the branch field of ticket #{ticket} to \"{remote_branch}\" \
                 because it has diverged from the current value \"{field}\"."
            ));
            self.prompt.show(&format!(
                "(use \"tug pull {ticket}\" to merge the changes from \"{field}\", or \
                 rerun with --force to overwrite the field)"
            ));
            return Err(Error::Diverged {
                ours: remote_branch.to_string(),
                theirs: field,
            });
        }

        self.prompt.show(&format!(
            "The branch field of ticket #{ticket} needs to be updated from its current \
             value \"{field}\" to \"{remote_branch}\"."
        ));
        if self.prompt.confirm("Change the \"Branch:\" field?", true)? {
            self.tracker
                .set_branch_field(ticket, remote_branch, Some(&field))?;
        }
        Ok(())
    }

    /// Merges a ticket, local branch or remote branch into the current
    /// branch.
    ///
    /// `pull` forces remote (true) or local (false) resolution; by default
    /// a ticket target and any name existing on the remote are pulled.
    /// `create_dependency` defaults to true when merging a ticket target
    /// while on another ticket; the recorded dependency append is
    /// idempotent. The pseudo-target `dependencies` merges every recorded
    /// dependency of the current ticket in order.
    pub fn merge(
        &mut self,
        ticket_or_branch: &str,
        pull: Option<bool>,
        create_dependency: Option<bool>,
    ) -> Result<()> {
        self.require_clean()?;
        let current_branch = self.git.current_branch()?.ok_or(Error::DetachedHead)?;
        let current_ticket = self.registry.ticket_for_branch(&current_branch);

        if ticket_or_branch == "dependencies" {
            let Some(current) = current_ticket else {
                return Err(Error::InvalidInput(
                    "dependencies can only be merged while on a ticket".to_string(),
                ));
            };
            if pull == Some(false) {
                return Err(Error::InvalidInput(
                    "\"pull\" must not be false when merging dependencies".to_string(),
                ));
            }
            if create_dependency.is_some() {
                return Err(Error::InvalidInput(
                    "\"create_dependency\" must not be set when merging dependencies"
                        .to_string(),
                ));
            }
            for dependency in self.registry.dependencies_for(current) {
                tracing::debug!(%dependency, "merging dependency");
                self.merge(&dependency.to_string(), Some(true), Some(false))?;
            }
            return Ok(());
        }

        let mut ticket: Option<TicketId> = None;
        let mut local_branch: Option<String> = None;
        let mut remote_branch: Option<String> = None;
        let do_pull;
        let mut record_dependency = false;

        if names::is_ticket_name(ticket_or_branch) {
            let target = self.ticket_from_name(ticket_or_branch, true)?;
            if current_ticket == Some(target) {
                return Err(Error::SelfMerge);
            }
            if create_dependency == Some(true) && current_ticket.is_none() {
                return Err(Error::InvalidInput(
                    "cannot record a dependency: not currently on a ticket".to_string(),
                ));
            }
            ticket = Some(target);
            do_pull = pull.unwrap_or(true);
            record_dependency = create_dependency.unwrap_or(true) && current_ticket.is_some();
            if do_pull {
                remote_branch = Some(
                    self.tracker
                        .branch_field(target)?
                        .ok_or(Error::UnsetBranchField(target.get()))?,
                );
            } else {
                let Some(local) = self.local_branch_for_ticket(target, false)? else {
                    return Err(Error::NoLocalBranchForTicket(target.get()));
                };
                local_branch = Some(local);
            }
        } else if pull == Some(false)
            || (pull.is_none()
                && !(names::is_remote_branch_name(ticket_or_branch)
                    && self.git.remote_branch_exists(ticket_or_branch)?))
        {
            self.check_local_branch(ticket_or_branch, Presence::Required)?;
            local_branch = Some(ticket_or_branch.to_string());
            do_pull = false;
            if create_dependency == Some(true) {
                let Some(target) = self.registry.ticket_for_branch(ticket_or_branch) else {
                    return Err(Error::InvalidInput(
                        "\"create_dependency\" requires the merged branch to be \
                         associated to a ticket"
                            .to_string(),
                    ));
                };
                if current_ticket.is_none() {
                    return Err(Error::InvalidInput(
                        "cannot record a dependency: not currently on a ticket".to_string(),
                    ));
                }
                if current_ticket == Some(target) {
                    return Err(Error::SelfMerge);
                }
                ticket = Some(target);
                record_dependency = true;
            }
        } else {
            self.check_remote_branch(ticket_or_branch, Presence::Any)?;
            if create_dependency == Some(true) {
                return Err(Error::InvalidInput(
                    "\"create_dependency\" must not be set when merging a remote branch"
                        .to_string(),
                ));
            }
            remote_branch = Some(ticket_or_branch.to_string());
            do_pull = true;
        }

        let merge_ref = if do_pull {
            let remote = remote_branch
                .ok_or_else(|| Error::InvalidInput("no remote branch to merge".to_string()))?;
            if !self.git.remote_branch_exists(&remote)? {
                self.prompt.show(&format!(
                    "Cannot merge remote branch \"{remote}\": it does not exist."
                ));
                return Err(Error::NoSuchRemoteBranch(remote));
            }
            self.prompt.show(&format!(
                "Merging the remote branch \"{remote}\" into the local branch \
                 \"{current_branch}\"."
            ));
            self.git.fetch(&remote)?;
            "FETCH_HEAD".to_string()
        } else {
            let local = local_branch
                .ok_or_else(|| Error::InvalidInput("no local branch to merge".to_string()))?;
            self.prompt.show(&format!(
                "Merging the local branch \"{local}\" into the local branch \
                 \"{current_branch}\"."
            ));
            local
        };

        match self.git.merge(&merge_ref) {
            Ok(()) => self.prompt.show("Automatic merge successful."),
            Err(Error::Backend { detail, .. }) => self.resolve_merge_conflicts(&detail)?,
            Err(e) => return Err(e),
        }

        if record_dependency {
            if let (Some(target), Some(current)) = (ticket, current_ticket) {
                let mut dependencies = self.registry.dependencies_for(current);
                if dependencies.contains(&target) {
                    tracing::debug!(
                        "dependency on #{target} already recorded for #{current}"
                    );
                } else {
                    self.prompt
                        .show(&format!("Added dependency on #{target} to #{current}."));
                    dependencies.push(target);
                    self.registry
                        .set_dependencies(current, Some(&dependencies))?;
                }
            }
        }
        Ok(())
    }

    /// Creates `branch` off the trunk and merges every target into it.
    ///
    /// Targets resolve like merge arguments: a ticket pulls the branch
    /// declared on the tracker, an existing local branch merges directly,
    /// anything else must exist on the remote. Any failure deletes the new
    /// branch and returns to the previous checkout, so a half-gathered
    /// branch never survives.
    pub fn gather(&mut self, branch: &str, targets: &[String]) -> Result<()> {
        self.require_clean()?;
        self.check_local_branch(branch, Presence::Absent)?;
        if !self.git.branch_exists(&self.config.trunk)? {
            return Err(Error::NoSuchLocalBranch(self.config.trunk.clone()));
        }

        // Resolve every target before the first mutation.
        let mut merges: Vec<(bool, String)> = Vec::new();
        for target in targets {
            if names::is_ticket_name(target) {
                let ticket = self.ticket_from_name(target, true)?;
                let remote = self
                    .tracker
                    .branch_field(ticket)?
                    .ok_or(Error::UnsetBranchField(ticket.get()))?;
                self.check_remote_branch(&remote, Presence::Required)?;
                merges.push((true, remote));
            } else if self.git.branch_exists(target)? {
                self.check_local_branch(target, Presence::Required)?;
                merges.push((false, target.clone()));
            } else {
                self.check_remote_branch(target, Presence::Required)?;
                merges.push((true, target.clone()));
            }
        }

        let previous = self.git.current_branch()?;
        tracing::debug!(branch, "creating gather branch off the trunk");
        self.git.branch(branch, &self.config.trunk)?;
        self.git.checkout(branch, false)?;
        if let Err(e) = self.run_gather_merges(&merges) {
            let restore = previous.unwrap_or_else(|| self.config.trunk.clone());
            let _ = self.git.merge_abort();
            let _ = self.git.reset_hard("HEAD");
            let _ = self.git.clean_untracked();
            let _ = self.git.checkout(&restore, false);
            let _ = self.git.delete_branch(branch, true);
            tracing::debug!(branch, "deleted gather branch after failure");
            return Err(e);
        }
        Ok(())
    }

    fn run_gather_merges(&mut self, merges: &[(bool, String)]) -> Result<()> {
        for (pull, name) in merges {
            self.merge(name, Some(*pull), Some(false))?;
        }
        Ok(())
    }

    // The interactive conflict-resolution loop. `ok` commits the resolved
    // tree; `abort` restores the pre-merge clean state and cancels.
    fn resolve_merge_conflicts(&mut self, detail: &str) -> Result<()> {
        self.prompt
            .show("Automatic merge failed, there are conflicting commits.");
        if !detail.is_empty() {
            self.prompt.show(detail);
        }
        self.prompt.show(
            "Please edit the affected files to resolve the conflicts. When you are \
             finished, your resolution will be committed.",
        );
        loop {
            let sel = self.prompt.select("Finished?", &["ok", "abort"], 1)?;
            if sel == "abort" {
                self.git.merge_abort()?;
                self.git.reset_hard("HEAD")?;
                self.git.clean_untracked()?;
                return Err(Error::Cancelled("user requested"));
            }
            match self.git.commit_merge_resolution() {
                Ok(()) => {
                    self.prompt
                        .show("Created a commit from your conflict resolution.");
                    return Ok(());
                }
                Err(Error::Backend { detail, .. }) => {
                    self.prompt
                        .show(&format!("The resolution is not complete yet:\n{detail}"));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Shows how the working tree differs from `base`: the last commit by
    /// default, a ticket's declared branch, or any local or remote branch.
    pub fn diff(&mut self, base: Option<&str>) -> Result<String> {
        let base = match base {
            None => "HEAD".to_string(),
            Some(name) if names::is_ticket_name(name) => {
                let ticket = self.ticket_from_name(name, true)?;
                let field = self
                    .tracker
                    .branch_field(ticket)?
                    .ok_or(Error::UnsetBranchField(ticket.get()))?;
                if !self.git.remote_branch_exists(&field)? {
                    return Err(Error::NoSuchRemoteBranch(field));
                }
                self.git.fetch(&field)?;
                "FETCH_HEAD".to_string()
            }
            Some(name) if self.git.branch_exists(name)? => name.to_string(),
            Some(name) => {
                self.check_remote_branch(name, Presence::Any)?;
                if !self.git.remote_branch_exists(name)? {
                    return Err(Error::NoSuchRef(name.to_string()));
                }
                self.git.fetch(name)?;
                "FETCH_HEAD".to_string()
            }
        };
        self.git.diff(&base)
    }

    /// Reports how `branch` (default: the current branch) relates to the
    /// ticket's declared branch and to its own recorded push target.
    pub fn local_status(&mut self, branch: Option<&str>) -> Result<LocalStatus> {
        let branch = match branch {
            Some(name) => {
                self.check_local_branch(name, Presence::Required)?;
                name.to_string()
            }
            None => self.git.current_branch()?.ok_or(Error::DetachedHead)?,
        };
        let ticket = self.registry.ticket_for_branch(&branch);
        let trunk = self.config.trunk.clone();
        let base_local = self.git.merge_base(&trunk, &branch)?;
        let commits_from_trunk = self
            .git
            .log(&format!("{base_local}..{branch}"), "%h")?
            .len();

        let ticket_branch = match ticket {
            Some(ticket) => match self.tracker.branch_field(ticket)? {
                Some(field) if self.git.remote_branch_exists(&field)? => {
                    self.git.fetch(&field)?;
                    Some(self.compare_with_fetched(&field, &trunk, &base_local, &branch)?)
                }
                _ => None,
            },
            None => None,
        };

        let remote_branch = match self.registry.remote_branch_for(&branch).map(str::to_string)
        {
            Some(remote) if self.git.remote_branch_exists(&remote)? => {
                self.git.fetch(&remote)?;
                Some(self.compare_with_fetched(&remote, &trunk, &base_local, &branch)?)
            }
            _ => None,
        };

        Ok(LocalStatus {
            branch,
            ticket,
            commits_from_trunk,
            ticket_branch,
            remote_branch,
        })
    }

    // Compares the local branch against the branch currently sitting in
    // FETCH_HEAD, using symmetric commit counts on both sides of the trunk
    // merge base.
    fn compare_with_fetched(
        &self,
        name: &str,
        trunk: &str,
        base_local: &str,
        branch: &str,
    ) -> Result<RemoteComparison> {
        let base_other = self.git.merge_base(trunk, "FETCH_HEAD")?;
        let commits_from_trunk = self
            .git
            .log(&format!("{base_other}..FETCH_HEAD"), "%h")?
            .len();
        let relation = if base_other == base_local {
            let ahead = self.git.log(&format!("FETCH_HEAD..{branch}"), "%h")?.len();
            let behind = self.git.log(&format!("{branch}..FETCH_HEAD"), "%h")?.len();
            Some(match (ahead, behind) {
                (0, 0) => BranchRelation::Identical,
                (ahead, 0) => BranchRelation::Ahead(ahead),
                (0, behind) => BranchRelation::Behind(behind),
                (ahead, behind) => BranchRelation::Diverged { ahead, behind },
            })
        } else {
            None
        };
        Ok(RemoteComparison {
            name: name.to_string(),
            commits_from_trunk,
            relation,
        })
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted ticket/branch registry.
//!
//! Four maps, one durable JSON record each, stored under `<git-dir>/tug/` so
//! that cloning the working copy also clones this state:
//!
//! - ticket → local branch and local branch → ticket (one bidirectional
//!   link, mutated only through [`Registry::bind`] / [`Registry::unbind`])
//! - local branch → remote branch
//! - ticket → dependency list (ordered)
//!
//! Every mutation rewrites the affected record through a temp file followed
//! by an atomic rename, so a crash mid-write never corrupts other entries.
//! Records from the legacy `.tug/` directory at the repository root are
//! migrated forward on open.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::ticket::TicketId;

const REGISTRY_DIR: &str = "tug";
const LEGACY_DIR: &str = ".tug";

const TICKET_TO_BRANCH: &str = "ticket_to_branch.json";
const BRANCH_TO_TICKET: &str = "branch_to_ticket.json";
const REMOTE_BRANCHES: &str = "remote_branches.json";
const DEPENDENCIES: &str = "dependencies.json";

const RECORDS: &[&str] = &[
    TICKET_TO_BRANCH,
    BRANCH_TO_TICKET,
    REMOTE_BRANCHES,
    DEPENDENCIES,
];

/// The local registry of ticket↔branch↔dependency relationships.
#[derive(Debug)]
pub struct Registry {
    dir: PathBuf,
    ticket_to_branch: BTreeMap<u64, String>,
    branch_to_ticket: BTreeMap<String, u64>,
    remote_branches: BTreeMap<String, String>,
    dependencies: BTreeMap<u64, Vec<u64>>,
}

impl Registry {
    /// Opens (creating if necessary) the registry under `git_dir`.
    ///
    /// `repo_root` is only used to locate legacy records to migrate.
    pub fn open(git_dir: &Path, repo_root: &Path) -> Result<Self> {
        let dir = git_dir.join(REGISTRY_DIR);
        fs::create_dir_all(&dir)?;
        migrate_legacy(&repo_root.join(LEGACY_DIR), &dir)?;
        Ok(Registry {
            ticket_to_branch: load(&dir.join(TICKET_TO_BRANCH))?,
            branch_to_ticket: load(&dir.join(BRANCH_TO_TICKET))?,
            remote_branches: load(&dir.join(REMOTE_BRANCHES))?,
            dependencies: load(&dir.join(DEPENDENCIES))?,
            dir,
        })
    }

    /// Directory holding the persisted records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The local branch bound to `ticket`, if any.
    pub fn branch_for_ticket(&self, ticket: TicketId) -> Option<&str> {
        self.ticket_to_branch.get(&ticket.get()).map(String::as_str)
    }

    /// The ticket bound to `branch`, if any.
    pub fn ticket_for_branch(&self, branch: &str) -> Option<TicketId> {
        self.branch_to_ticket.get(branch).copied().map(TicketId::new)
    }

    /// Binds `ticket` and `branch` to each other.
    ///
    /// Any previous link on either side is dropped first, keeping the
    /// relation 1:1 in both directions.
    pub fn bind(&mut self, ticket: TicketId, branch: &str) -> Result<()> {
        if let Some(old_branch) = self.ticket_to_branch.get(&ticket.get()).cloned() {
            self.branch_to_ticket.remove(&old_branch);
        }
        if let Some(old_ticket) = self.branch_to_ticket.get(branch).copied() {
            self.ticket_to_branch.remove(&old_ticket);
        }
        self.ticket_to_branch.insert(ticket.get(), branch.to_string());
        self.branch_to_ticket.insert(branch.to_string(), ticket.get());
        self.persist_links()
    }

    /// Removes the link for `ticket`, on both sides.
    ///
    /// The ticket itself remains known to the tracker; only the local
    /// binding goes away.
    pub fn unbind(&mut self, ticket: TicketId) -> Result<()> {
        if let Some(branch) = self.ticket_to_branch.remove(&ticket.get()) {
            self.branch_to_ticket.remove(&branch);
        }
        self.persist_links()
    }

    /// The remote branch recorded as the push target for `branch`.
    pub fn remote_branch_for(&self, branch: &str) -> Option<&str> {
        self.remote_branches.get(branch).map(String::as_str)
    }

    /// Records `remote` as the push target for `branch`.
    pub fn set_remote_branch(&mut self, branch: &str, remote: &str) -> Result<()> {
        self.remote_branches
            .insert(branch.to_string(), remote.to_string());
        self.persist(REMOTE_BRANCHES, &self.remote_branches)
    }

    /// Drops the recorded push target for `branch`.
    pub fn clear_remote_branch(&mut self, branch: &str) -> Result<()> {
        if self.remote_branches.remove(branch).is_some() {
            self.persist(REMOTE_BRANCHES, &self.remote_branches)?;
        }
        Ok(())
    }

    /// The locally recorded dependencies of `ticket`, in insertion order.
    pub fn dependencies_for(&self, ticket: TicketId) -> Vec<TicketId> {
        self.dependencies
            .get(&ticket.get())
            .map(|deps| deps.iter().copied().map(TicketId::new).collect())
            .unwrap_or_default()
    }

    /// Replaces the dependency list of `ticket`; `None` clears it.
    pub fn set_dependencies(
        &mut self,
        ticket: TicketId,
        dependencies: Option<&[TicketId]>,
    ) -> Result<()> {
        match dependencies {
            Some(deps) => {
                let raw: Vec<u64> = deps.iter().map(|d| d.get()).collect();
                self.dependencies.insert(ticket.get(), raw);
            }
            None => {
                self.dependencies.remove(&ticket.get());
            }
        }
        self.persist(DEPENDENCIES, &self.dependencies)
    }

    fn persist_links(&self) -> Result<()> {
        self.persist(TICKET_TO_BRANCH, &self.ticket_to_branch)?;
        self.persist(BRANCH_TO_TICKET, &self.branch_to_ticket)
    }

    fn persist<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        let file = fs::File::create(&tmp)?;
        serde_json::to_writer_pretty(&file, value)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn load<T: Default + DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&data)?)
}

/// Moves records from the legacy `.tug/` directory into the git dir.
///
/// Earlier releases kept the registry next to the working tree, which broke
/// when a user had several clones. The move is one-time and transparent.
fn migrate_legacy(legacy_dir: &Path, dir: &Path) -> Result<()> {
    if !legacy_dir.is_dir() {
        return Ok(());
    }
    for name in RECORDS {
        let old = legacy_dir.join(name);
        let new = dir.join(name);
        if old.exists() && !new.exists() {
            tracing::info!(record = name, "migrating legacy registry record");
            fs::rename(&old, &new)?;
        }
    }
    // Leftover legacy files (or a non-empty dir) are the user's business.
    let _ = fs::remove_dir(legacy_dir);
    Ok(())
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The dependency graph manager.
//!
//! Dependency lists are stored locally per ticket and only reconciled with
//! the tracker's lists during push. A ticket never lists itself.

use crate::error::{Error, Result};
use crate::prompt::Prompt;
use crate::session::Session;
use crate::ticket::TicketId;
use crate::tracker::Tracker;

impl Session {
    /// Dependencies of `ticket`.
    ///
    /// With `recursive`, performs a depth-first traversal collecting every
    /// reachable ticket exactly once. Tickets without a local branch are
    /// reported as warnings and treated as leaves, since their dependency
    /// lists may be incomplete locally.
    pub fn dependencies_for(&mut self, ticket: TicketId, recursive: bool) -> Result<Vec<TicketId>> {
        if !recursive {
            return Ok(self.registry.dependencies_for(ticket));
        }

        let mut seen: Vec<TicketId> = Vec::new();
        let mut stack = vec![ticket];
        while let Some(current) = stack.pop() {
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            if current != ticket && self.registry.branch_for_ticket(current).is_none() {
                tracing::warn!(ticket = %current, "no local branch, dependencies may be incomplete");
                self.prompt.show(&format!(
                    "No local branch for ticket #{current}; some dependencies might be \
                     missing from the output."
                ));
                continue;
            }
            for dep in self.registry.dependencies_for(current).into_iter().rev() {
                if !seen.contains(&dep) {
                    stack.push(dep);
                }
            }
        }
        seen.remove(0);
        Ok(seen)
    }

    /// Replaces the recorded dependencies of `ticket`; `None` clears them.
    pub fn set_dependencies(
        &mut self,
        ticket: TicketId,
        dependencies: Option<Vec<TicketId>>,
    ) -> Result<()> {
        if let Some(deps) = &dependencies {
            if deps.contains(&ticket) {
                return Err(Error::SelfDependency);
            }
        }
        self.registry.set_dependencies(ticket, dependencies.as_deref())
    }

    /// Reconciles the local dependency list with the tracker's after a
    /// push.
    ///
    /// When the lists differ the user chooses `{upload, download, keep}`:
    /// upload pushes the local list to the tracker, download overwrites the
    /// local list, keep leaves both as they are. Equal lists never prompt.
    pub(crate) fn reconcile_dependencies_on_push(&mut self, ticket: TicketId) -> Result<()> {
        let remote = self.tracker.dependencies(ticket)?;
        let local = self.registry.dependencies_for(ticket);
        if remote == local {
            tracing::debug!(%ticket, "dependencies already in sync");
            return Ok(());
        }

        self.prompt.show(&format!(
            "The tracker says ticket #{ticket} depends on {} while your local branch \
             depends on {}. Updating dependencies is recommended but optional.",
            format_deps(&remote),
            format_deps(&local),
        ));
        let sel = self.prompt.select(
            "Action for dependencies?",
            &["upload", "download", "keep"],
            2,
        )?;
        match sel.as_str() {
            "upload" => {
                self.prompt.show(&format!(
                    "Uploading your dependencies for ticket #{ticket}: {} => {}",
                    format_deps(&remote),
                    format_deps(&local),
                ));
                self.tracker.set_dependencies(ticket, &local)?;
            }
            "download" => {
                tracing::debug!(%ticket, "downloading tracker dependencies");
                self.registry.set_dependencies(ticket, Some(&remote))?;
            }
            _ => {}
        }
        Ok(())
    }
}

pub(crate) fn format_deps(deps: &[TicketId]) -> String {
    if deps.is_empty() {
        return "no tickets".to_string();
    }
    deps.iter()
        .map(|d| format!("#{d}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;

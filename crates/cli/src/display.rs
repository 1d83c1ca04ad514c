// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of listings and status reports.

use tug_core::{BranchRelation, LocalStatus, RemoteComparison, TicketId, TicketListEntry};

/// Renders the ticket/branch listing, current branch starred.
pub fn render_tickets(entries: &[TicketListEntry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        let marker = if entry.current { "*" } else { " " };
        let ticket = match entry.ticket {
            Some(ticket) => format!("#{ticket}"),
            None => String::new(),
        };
        let mut line = format!("{marker} {ticket:>7}: {}", entry.branch);
        if !entry.summary.is_empty() {
            line.push(' ');
            line.push_str(&entry.summary);
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Renders the status summary for a branch.
pub fn render_status(status: &LocalStatus) -> String {
    let mut lines = Vec::new();
    match status.ticket {
        Some(ticket) => lines.push(format!(
            "On ticket #{ticket} with local branch \"{}\".",
            status.branch
        )),
        None => lines.push(format!("On local branch \"{}\".", status.branch)),
    }
    lines.push(format!(
        "Your branch \"{}\" has {} commit{} on top of the trunk.",
        status.branch,
        status.commits_from_trunk,
        plural(status.commits_from_trunk),
    ));
    if let Some(comparison) = &status.ticket_branch {
        lines.push(render_comparison(
            &status.branch,
            "The ticket's branch field points to",
            comparison,
        ));
    } else if status.ticket.is_some() {
        lines.push("The ticket's branch field is not set or points nowhere.".to_string());
    }
    if let Some(comparison) = &status.remote_branch {
        lines.push(render_comparison(
            &status.branch,
            "Your push target is",
            comparison,
        ));
    }
    lines.join("\n")
}

fn render_comparison(branch: &str, lead: &str, comparison: &RemoteComparison) -> String {
    let mut line = format!(
        "{lead} \"{}\" with {} commit{} on top of the trunk. ",
        comparison.name,
        comparison.commits_from_trunk,
        plural(comparison.commits_from_trunk),
    );
    match &comparison.relation {
        None => line.push_str(
            "It cannot be compared to your branch: they are based on different \
             versions of the trunk.",
        ),
        Some(BranchRelation::Identical) => {
            line.push_str(&format!("It does not differ from \"{branch}\"."));
        }
        Some(BranchRelation::Ahead(n)) => {
            line.push_str(&format!(
                "\"{branch}\" is ahead of it by {n} commit{}.",
                plural(*n)
            ));
        }
        Some(BranchRelation::Behind(n)) => {
            line.push_str(&format!(
                "It is ahead of \"{branch}\" by {n} commit{}.",
                plural(*n)
            ));
        }
        Some(BranchRelation::Diverged { ahead, behind }) => {
            line.push_str(&format!(
                "The branches have diverged: \"{branch}\" is ahead by {ahead} \
                 commit{}, it is ahead by {behind} commit{}.",
                plural(*ahead),
                plural(*behind),
            ));
        }
    }
    line
}

/// Renders a dependency listing.
pub fn render_dependencies(ticket: TicketId, dependencies: &[TicketId]) -> String {
    if dependencies.is_empty() {
        return format!("Ticket #{ticket} has no dependencies.");
    }
    let list: Vec<String> = dependencies.iter().map(|d| format!("#{d}")).collect();
    format!("Ticket #{ticket} depends on {}.", list.join(", "))
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;

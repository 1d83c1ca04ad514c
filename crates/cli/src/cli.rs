// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use clap_complete::Shell;

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Working on tickets:
  create      Create a new ticket on the tracker
  checkout    Check out a ticket or branch
  merge       Merge a ticket or branch into the current branch
  gather      Start a new branch with several tickets merged in
  pull        Merge the remote changes for a ticket
  push        Push the current branch and update the ticket
  status      Show how a branch relates to its remote counterparts
  diff        Show how the working tree differs from a base
  tickets     List local branches and their tickets
  deps        Show the dependencies of a ticket
  dep         Record the dependencies of a ticket
  undep       Clear the recorded dependencies of a ticket

Housekeeping:
  abandon     Move a ticket's branch to the trash
  prune       Abandon ticket branches merged into the trunk
  vanilla     Check out a plain copy of a release, detached
  config      Manage configuration
  completion  Generate shell completions";

const QUICKSTART_HELP: &str = "\
Get started:
  tug create --summary \"Fix the bug\"   Create a ticket
  tug checkout --ticket 1               Start a branch for ticket #1
  tug push                              Publish your commits
  tug pull                              Merge remote changes";

#[derive(Parser)]
#[command(name = "tug")]
#[command(about = "Map tracker tickets onto git branches and keep both in sync")]
#[command(
    long_about = "Map tracker tickets onto git branches and keep both in sync.\n\n\
    tug records which local branch implements which ticket, which remote\n\
    branch it is pushed to, and which tickets it depends on, and reconciles\n\
    that record with the remote repository and the ticket tracker."
)]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new ticket on the tracker
    #[command(after_help = "Examples:\n  \
        tug create --summary \"Fix crash\"                 Create with a summary\n  \
        tug create                                       Prompt for the summary")]
    Create {
        /// One-line summary for the new ticket
        #[arg(long)]
        summary: Option<String>,

        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },

    /// Check out a ticket or branch
    #[command(after_help = "Examples:\n  \
        tug checkout --ticket 1                  Branch for ticket #1\n  \
        tug checkout --branch feature            Switch to a local branch\n  \
        tug checkout --ticket 2 --base 1         Branch for #2 on top of #1's branch\n  \
        tug checkout --ticket 2 --base main      Branch for #2 off a local branch\n\n\
        A base of '.' means the currently checked-out ticket.")]
    Checkout {
        /// Ticket to check out (123, #123 or ticket/123)
        #[arg(long, short)]
        ticket: Option<String>,

        /// Local branch to check out or to bind to the ticket
        #[arg(long, short)]
        branch: Option<String>,

        /// Base for a newly created branch: a local branch, a ticket
        /// reference, or '.' for the current ticket
        #[arg(long)]
        base: Option<String>,
    },

    /// Push the current branch and update the ticket's branch field
    Push {
        /// Ticket to push for (defaults to the current branch's ticket)
        ticket: Option<String>,

        /// Remote branch to push to (defaults to the recorded push target)
        #[arg(long)]
        remote_branch: Option<String>,

        /// Push even if remote commits would be discarded
        #[arg(long, short)]
        force: bool,
    },

    /// Fetch and merge the remote changes for a ticket
    Pull {
        /// Ticket or remote branch (defaults to the current ticket)
        ticket_or_remote_branch: Option<String>,
    },

    /// Merge a ticket or branch into the current branch
    #[command(after_help = "Examples:\n  \
        tug merge 2                       Merge the remote branch of ticket #2\n  \
        tug merge feature --pull false    Merge a local branch\n  \
        tug merge dependencies            Merge all recorded dependencies")]
    Merge {
        /// Ticket, local branch, remote branch, or 'dependencies'
        /// (defaults to the trunk branch)
        ticket_or_branch: Option<String>,

        /// Force remote (true) or local (false) resolution of the target
        #[arg(long)]
        pull: Option<bool>,

        /// Record the merged ticket as a dependency of the current one
        #[arg(long)]
        create_dependency: Option<bool>,
    },

    /// Create a new branch with several tickets or branches merged in
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
        tug gather integration 1 2         Merge tickets #1 and #2 into a new branch\n  \
        tug gather preview 1 feature       Tickets and local branches can be mixed"
    )]
    Gather {
        /// Name of the new branch
        branch: String,

        /// Tickets, local branches or remote branches to merge
        #[arg(required = true)]
        targets: Vec<String>,
    },

    /// Show how a branch relates to its remote counterparts
    Status {
        /// Branch to report on (defaults to the current branch)
        branch: Option<String>,
    },

    /// Show how the working tree differs from a base
    Diff {
        /// Base to diff against: a ticket, a branch, or nothing for the
        /// last commit
        base: Option<String>,
    },

    /// List local branches and their tickets
    Tickets {
        /// Include abandoned (trash) branches
        #[arg(long)]
        all: bool,
    },

    /// Show the dependencies of a ticket
    Deps {
        /// Ticket (defaults to the current ticket)
        ticket: Option<String>,

        /// Follow dependencies transitively
        #[arg(long, short)]
        recursive: bool,
    },

    /// Record the dependencies of a ticket (replaces the list)
    #[command(arg_required_else_help = true)]
    Dep {
        /// Ticket whose dependencies are recorded
        ticket: String,

        /// Tickets it depends on
        #[arg(required = true)]
        dependencies: Vec<String>,
    },

    /// Clear the recorded dependencies of a ticket
    #[command(arg_required_else_help = true)]
    Undep {
        /// Ticket whose dependencies are cleared
        ticket: String,
    },

    /// Move a ticket's branch to the trash instead of deleting it
    Abandon {
        /// Ticket or local branch (defaults to the current branch)
        ticket_or_branch: Option<String>,
    },

    /// Abandon all ticket branches already merged into the trunk
    Prune,

    /// Check out a plain copy of a release, detached
    Vanilla {
        /// Tag, branch or commit (defaults to the trunk branch)
        release: Option<String>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Set a configuration value (username, trunk, remote, tracker-url)
    Set {
        /// Key to set
        key: String,
        /// Value to store
        value: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

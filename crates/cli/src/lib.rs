// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tugrs - library behind the `tug` CLI.
//!
//! The heavy lifting lives in [`tug_core`]; this crate parses arguments,
//! loads configuration, wires up the terminal prompt and the HTTP tracker
//! client, and renders results.

mod cli;
mod config;
mod display;
mod term;
mod trac;

pub use cli::{Cli, Command, ConfigCommand};
pub use config::Config;
pub use term::TerminalPrompt;
pub use trac::{HttpTracker, UnconfiguredTracker};

use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;

use tug_core::{
    BaseSpec, Error, Git, Prompt, Result, Session, TicketAttributes, Tracker,
};

/// Executes a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "tug", &mut std::io::stdout());
            Ok(())
        }
        Command::Config(cmd) => run_config(cmd),
        command => {
            let mut session = open_session()?;
            run_in_session(&mut session, command)
        }
    }
}

fn run_in_session(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Create {
            summary,
            description,
        } => {
            let summary = match summary {
                Some(summary) => summary,
                None => session.prompt().get_input("Summary:")?,
            };
            if summary.is_empty() {
                return Err(Error::InvalidInput(
                    "a ticket needs a summary".to_string(),
                ));
            }
            let attributes = TicketAttributes {
                summary,
                description,
                status: None,
            };
            session.create_ticket(&attributes)?;
            Ok(())
        }
        Command::Checkout {
            ticket,
            branch,
            base,
        } => {
            let base = match base.as_deref() {
                None => BaseSpec::Unspecified,
                Some(".") => BaseSpec::CurrentTicket,
                Some(name) => BaseSpec::Name(name.to_string()),
            };
            session.checkout(ticket.as_deref(), branch.as_deref(), base)
        }
        Command::Push {
            ticket,
            remote_branch,
            force,
        } => session.push(ticket.as_deref(), remote_branch.as_deref(), force),
        Command::Pull {
            ticket_or_remote_branch,
        } => session.pull(ticket_or_remote_branch.as_deref()),
        Command::Merge {
            ticket_or_branch,
            pull,
            create_dependency,
        } => match ticket_or_branch {
            Some(target) => session.merge(&target, pull, create_dependency),
            None => {
                // Bare `tug merge` brings the local trunk in; pulling the
                // remote trunk stays an explicit --pull true.
                let trunk = session.config().trunk.clone();
                session.merge(&trunk, pull.or(Some(false)), create_dependency)
            }
        },
        Command::Gather { branch, targets } => session.gather(&branch, &targets),
        Command::Status { branch } => {
            let status = session.local_status(branch.as_deref())?;
            println!("{}", display::render_status(&status));
            Ok(())
        }
        Command::Diff { base } => {
            print!("{}", session.diff(base.as_deref())?);
            Ok(())
        }
        Command::Tickets { all } => {
            let entries = session.ticket_list(all)?;
            if entries.is_empty() {
                println!("No local branches.");
            } else {
                println!("{}", display::render_tickets(&entries));
            }
            Ok(())
        }
        Command::Deps { ticket, recursive } => {
            let ticket = match ticket {
                Some(name) => session.ticket_from_name(&name, false)?,
                None => session.current_ticket()?.ok_or_else(|| {
                    Error::InvalidInput(
                        "not currently on a ticket; specify one".to_string(),
                    )
                })?,
            };
            let dependencies = session.dependencies_for(ticket, recursive)?;
            println!("{}", display::render_dependencies(ticket, &dependencies));
            Ok(())
        }
        Command::Dep {
            ticket,
            dependencies,
        } => {
            let ticket = session.ticket_from_name(&ticket, false)?;
            let dependencies = dependencies
                .iter()
                .map(|name| session.ticket_from_name(name, false))
                .collect::<Result<Vec<_>>>()?;
            session.set_dependencies(ticket, Some(dependencies))?;
            println!("Recorded dependencies for #{ticket}.");
            Ok(())
        }
        Command::Undep { ticket } => {
            let ticket = session.ticket_from_name(&ticket, false)?;
            session.set_dependencies(ticket, None)?;
            println!("Cleared dependencies for #{ticket}.");
            Ok(())
        }
        Command::Abandon { ticket_or_branch } => {
            session.abandon(ticket_or_branch.as_deref())
        }
        Command::Prune => session.prune(),
        Command::Vanilla { release } => {
            let release = release.unwrap_or_else(|| session.config().trunk.clone());
            session.vanilla(&release)
        }
        // Handled before a session is opened.
        Command::Completion { .. } | Command::Config(_) => Ok(()),
    }
}

fn run_config(command: ConfigCommand) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let git = Git::open(&cwd, "origin")?;
    let mut config = Config::load(git.git_dir())?;
    match command {
        ConfigCommand::Show => {
            println!("username    = {}", config.username());
            println!("trunk       = {}", config.trunk());
            println!("remote      = {}", config.remote());
            println!(
                "tracker-url = {}",
                config.tracker_url().unwrap_or_else(|| "(unset)".to_string())
            );
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save(git.git_dir())?;
            println!("{key} = {value}");
            Ok(())
        }
    }
}

fn open_session() -> Result<Session> {
    let cwd = std::env::current_dir()?;
    let probe = Git::open(&cwd, "origin")?;
    let config = Config::load(probe.git_dir())?;
    let remote = config.remote();
    let git = if remote == "origin" {
        probe
    } else {
        Git::open(&cwd, &remote)?
    };
    let tracker: Rc<dyn Tracker> = match config.tracker_url() {
        Some(url) => Rc::new(HttpTracker::new(&url)),
        None => Rc::new(UnconfiguredTracker),
    };
    let prompt: Rc<dyn Prompt> = Rc::new(TerminalPrompt::new());
    Session::new(git, tracker, prompt, config.session_config())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

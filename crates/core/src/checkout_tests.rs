// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::error::Error;
use crate::testutil::{commit_file, git, scratch_repo, scratch_repo_with_remote, session_in};
use crate::tracker::Tracker;

fn new_ticket(harness: &crate::testutil::Harness, summary: &str) -> TicketId {
    harness
        .tracker
        .create_ticket(&TicketAttributes::with_summary(summary))
        .unwrap()
}

#[test]
fn test_checkout_requires_a_ticket_or_branch() {
    let temp = scratch_repo();
    let (mut session, _harness) = session_in(temp.path(), "alice");
    assert!(matches!(
        session.checkout(None, None, BaseSpec::Unspecified),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_checkout_unknown_ticket_fails() {
    let temp = scratch_repo();
    let (mut session, _harness) = session_in(temp.path(), "alice");
    assert!(matches!(
        session.checkout(Some("17"), None, BaseSpec::Unspecified),
        Err(Error::NoSuchTicket(17))
    ));
}

#[test]
fn test_checkout_ticket_creates_branch_off_the_trunk() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let ticket = new_ticket(&harness, "summary");

    session
        .checkout(Some(&ticket.to_string()), None, BaseSpec::Unspecified)
        .unwrap();

    assert_eq!(
        session.git().current_branch().unwrap().as_deref(),
        Some("ticket/1")
    );
    assert_eq!(
        session.registry.branch_for_ticket(ticket),
        Some("ticket/1")
    );
    assert_eq!(
        session.registry.remote_branch_for("ticket/1"),
        Some("u/alice/ticket/1")
    );
    assert_eq!(
        session.git().commit_for("ticket/1").unwrap(),
        session.git().commit_for("main").unwrap()
    );
    assert!(harness.prompt.saw("On ticket #1"));
}

#[test]
fn test_checkout_ticket_is_idempotent() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let ticket = new_ticket(&harness, "summary");

    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    let head = session.git().commit_for("HEAD").unwrap();

    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    assert_eq!(
        session.git().current_branch().unwrap().as_deref(),
        Some("ticket/1")
    );
    assert_eq!(session.git().commit_for("HEAD").unwrap(), head);
    assert_eq!(session.registry.branch_for_ticket(ticket), Some("ticket/1"));
    assert_eq!(
        session.registry.ticket_for_branch("ticket/1"),
        Some(ticket)
    );
}

#[test]
fn test_checkout_binds_an_existing_branch_to_the_ticket() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let ticket = new_ticket(&harness, "summary");
    git(temp.path(), &["branch", "feature"]);

    session
        .checkout(Some("1"), Some("feature"), BaseSpec::Unspecified)
        .unwrap();
    assert_eq!(session.registry.branch_for_ticket(ticket), Some("feature"));
    assert_eq!(
        session.git().current_branch().unwrap().as_deref(),
        Some("feature")
    );
}

#[test]
fn test_checkout_with_ticket_base_records_a_single_dependency() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let base_ticket = new_ticket(&harness, "base");
    let ticket = new_ticket(&harness, "work");

    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    commit_file(temp.path(), "base_work", "1\n", "work on base ticket");
    let base_head = session.git().commit_for("HEAD").unwrap();

    session
        .checkout(
            Some("2"),
            None,
            BaseSpec::Name(base_ticket.to_string()),
        )
        .unwrap();
    assert_eq!(
        session.git().current_branch().unwrap().as_deref(),
        Some("ticket/2")
    );
    // Branched from the base ticket's branch, not the trunk.
    assert_eq!(session.git().commit_for("HEAD").unwrap(), base_head);
    // The base becomes the sole recorded dependency.
    assert_eq!(
        session.dependencies_for(ticket, false).unwrap(),
        vec![base_ticket]
    );
}

#[test]
fn test_checkout_base_on_itself_is_rejected() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "summary");
    assert!(matches!(
        session.checkout(Some("1"), None, BaseSpec::Name("1".to_string())),
        Err(Error::SelfDependency)
    ));
}

#[test]
fn test_checkout_base_ticket_without_branch_field_fails() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "base without branch");
    new_ticket(&harness, "work");

    // Ticket 1 has no local branch and no branch field to pull from.
    assert!(matches!(
        session.checkout(Some("2"), None, BaseSpec::Name("1".to_string())),
        Err(Error::UnsetBranchField(1))
    ));
}

#[test]
fn test_checkout_missing_local_base_fails() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "summary");
    assert!(matches!(
        session.checkout(Some("1"), None, BaseSpec::Name("no-such-branch".to_string())),
        Err(Error::NoSuchLocalBranch(_))
    ));
}

#[test]
fn test_checkout_current_ticket_base_requires_a_current_ticket() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "summary");
    assert!(matches!(
        session.checkout(Some("1"), None, BaseSpec::CurrentTicket),
        Err(Error::NoBaseSpecified)
    ));
}

#[test]
fn test_fresh_branch_needs_confirmation_when_the_field_is_set() {
    let (repo, _remote) = scratch_repo_with_remote();
    let (mut session, harness) = session_in(repo.path(), "alice");
    let ticket = new_ticket(&harness, "summary");
    git(repo.path(), &["push", "origin", "main:u/bob/ticket/1"]);
    harness
        .tracker
        .set_branch_field(ticket, "u/bob/ticket/1", None)
        .unwrap();

    // Declining the confirmation aborts and leaves no partial branch.
    harness.prompt.push("n");
    assert!(matches!(
        session.checkout(Some("1"), None, BaseSpec::Name("main".to_string())),
        Err(Error::Cancelled(_))
    ));
    assert!(!session.git().branch_exists("ticket/1").unwrap());
    assert!(harness.prompt.saw("will not contain any work"));

    // Accepting creates the branch from the explicit base.
    harness.prompt.push("y");
    session
        .checkout(Some("1"), None, BaseSpec::Name("main".to_string()))
        .unwrap();
    assert_eq!(session.registry.branch_for_ticket(ticket), Some("ticket/1"));
}

#[test]
fn test_checkout_pulls_the_declared_branch_when_the_field_is_set() {
    let (repo, _remote) = scratch_repo_with_remote();
    git(repo.path(), &["branch", "work"]);
    git(repo.path(), &["checkout", "work"]);
    commit_file(repo.path(), "w", "1\n", "remote work");
    git(repo.path(), &["push", "origin", "work:u/bob/ticket/1"]);
    let work_head = {
        let handle = crate::git::Git::open(repo.path(), "origin").unwrap();
        handle.commit_for("work").unwrap()
    };
    git(repo.path(), &["checkout", "main"]);
    git(repo.path(), &["branch", "-D", "work"]);

    let (mut session, harness) = session_in(repo.path(), "alice");
    let ticket = new_ticket(&harness, "summary");
    harness
        .tracker
        .set_branch_field(ticket, "u/bob/ticket/1", None)
        .unwrap();

    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    assert_eq!(session.git().commit_for("HEAD").unwrap(), work_head);
}

#[test]
fn test_abandon_moves_the_branch_to_trash_and_clears_state() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let ticket = new_ticket(&harness, "summary");
    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    session
        .set_dependencies(ticket, Some(vec![TicketId::new(9)]))
        .unwrap();
    git(temp.path(), &["checkout", "main"]);

    session.abandon(Some("1")).unwrap();
    assert!(!session.git().branch_exists("ticket/1").unwrap());
    assert!(session.git().branch_exists("trash/ticket/1").unwrap());
    assert_eq!(session.registry.branch_for_ticket(ticket), None);
    assert_eq!(session.registry.ticket_for_branch("ticket/1"), None);
    assert!(session.dependencies_for(ticket, false).unwrap().is_empty());
    assert_eq!(session.registry.remote_branch_for("ticket/1"), None);
    assert!(harness.prompt.saw("Moved your branch"));
}

#[test]
fn test_abandon_trash_names_never_collide() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "summary");
    git(temp.path(), &["branch", "trash/ticket/1"]);

    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    git(temp.path(), &["checkout", "main"]);
    session.abandon(Some("1")).unwrap();
    assert!(session.git().branch_exists("trash/ticket/1_").unwrap());
}

#[test]
fn test_abandon_the_current_branch_fails_distinctly() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "summary");
    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();

    assert!(matches!(
        session.abandon(Some("1")),
        Err(Error::CurrentBranch(_))
    ));
    assert!(session.git().branch_exists("ticket/1").unwrap());
}

#[test]
fn test_abandon_protects_the_trunk() {
    let temp = scratch_repo();
    let (mut session, _harness) = session_in(temp.path(), "alice");
    git(temp.path(), &["branch", "other"]);
    git(temp.path(), &["checkout", "other"]);
    assert!(matches!(
        session.abandon(Some("main")),
        Err(Error::ProtectedBranch(_))
    ));
}

#[test]
fn test_abandon_without_a_local_branch_fails() {
    let temp = scratch_repo();
    let (mut session, _harness) = session_in(temp.path(), "alice");
    assert!(matches!(
        session.abandon(Some("5")),
        Err(Error::NoLocalBranchForTicket(5))
    ));
}

#[test]
fn test_prune_abandons_merged_ticket_branches() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "merged");
    new_ticket(&harness, "active");

    // Ticket 1 stays at the trunk commit (merged); ticket 2 moves ahead.
    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    session
        .checkout(Some("2"), None, BaseSpec::Unspecified)
        .unwrap();
    commit_file(temp.path(), "active", "1\n", "active work");
    git(temp.path(), &["checkout", "main"]);

    session.prune().unwrap();
    assert!(!session.git().branch_exists("ticket/1").unwrap());
    assert!(session.git().branch_exists("trash/ticket/1").unwrap());
    assert!(session.git().branch_exists("ticket/2").unwrap());
    assert!(harness.prompt.saw("Abandoning #1"));
}

#[test]
fn test_prune_skips_the_current_branch() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "merged");
    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();

    session.prune().unwrap();
    assert!(session.git().branch_exists("ticket/1").unwrap());
    assert!(harness.prompt.saw("it is the current branch"));
}

#[test]
fn test_vanilla_detaches_at_the_requested_ref() {
    let temp = scratch_repo();
    let (mut session, _harness) = session_in(temp.path(), "alice");
    session.vanilla("main").unwrap();
    assert_eq!(session.git().current_branch().unwrap(), None);
}

#[test]
fn test_ticket_list_skips_trash_and_marks_the_current_branch() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    new_ticket(&harness, "the summary");
    session
        .checkout(Some("1"), None, BaseSpec::Unspecified)
        .unwrap();
    git(temp.path(), &["branch", "trash/old"]);
    git(temp.path(), &["branch", "plain"]);

    let entries = session.ticket_list(false).unwrap();
    assert!(entries.iter().all(|e| e.branch != "trash/old"));

    let ticket_entry = entries.iter().find(|e| e.branch == "ticket/1").unwrap();
    assert_eq!(ticket_entry.ticket, Some(TicketId::new(1)));
    assert_eq!(ticket_entry.summary, "the summary");
    assert!(ticket_entry.current);

    let plain = entries.iter().find(|e| e.branch == "plain").unwrap();
    assert_eq!(plain.ticket, None);
    assert!(!plain.current);

    let with_trash = session.ticket_list(true).unwrap();
    assert!(with_trash.iter().any(|e| e.branch == "trash/old"));
}

#[test]
fn test_create_ticket_shows_the_checkout_hint() {
    let temp = scratch_repo();
    let (mut session, harness) = session_in(temp.path(), "alice");
    let ticket = session
        .create_ticket(&TicketAttributes::with_summary("new work"))
        .unwrap();
    assert_eq!(ticket, TicketId::new(1));
    assert!(harness.prompt.saw("Created ticket #1"));
    assert!(harness.prompt.saw("tug checkout --ticket 1"));
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;

fn open_registry(temp: &TempDir) -> Registry {
    let git_dir = temp.path().join(".git");
    std::fs::create_dir_all(&git_dir).unwrap();
    Registry::open(&git_dir, temp.path()).unwrap()
}

fn t(id: u64) -> TicketId {
    TicketId::new(id)
}

#[test]
fn test_absent_keys_are_a_valid_state() {
    let temp = TempDir::new().unwrap();
    let registry = open_registry(&temp);
    assert_eq!(registry.branch_for_ticket(t(1)), None);
    assert_eq!(registry.ticket_for_branch("ticket/1"), None);
    assert_eq!(registry.remote_branch_for("ticket/1"), None);
    assert!(registry.dependencies_for(t(1)).is_empty());
}

#[test]
fn test_bind_links_both_sides() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry.bind(t(1), "ticket/1").unwrap();
    assert_eq!(registry.branch_for_ticket(t(1)), Some("ticket/1"));
    assert_eq!(registry.ticket_for_branch("ticket/1"), Some(t(1)));
}

#[test]
fn test_rebinding_drops_stale_links() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry.bind(t(1), "ticket/1").unwrap();

    // Moving the ticket to another branch frees the old branch.
    registry.bind(t(1), "feature").unwrap();
    assert_eq!(registry.branch_for_ticket(t(1)), Some("feature"));
    assert_eq!(registry.ticket_for_branch("ticket/1"), None);

    // Claiming the branch for another ticket frees the old ticket.
    registry.bind(t(2), "feature").unwrap();
    assert_eq!(registry.ticket_for_branch("feature"), Some(t(2)));
    assert_eq!(registry.branch_for_ticket(t(1)), None);
}

#[test]
fn test_unbind_clears_both_sides() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry.bind(t(1), "ticket/1").unwrap();
    registry.unbind(t(1)).unwrap();
    assert_eq!(registry.branch_for_ticket(t(1)), None);
    assert_eq!(registry.ticket_for_branch("ticket/1"), None);
    // Unbinding an absent ticket is a no-op, not an error.
    registry.unbind(t(1)).unwrap();
}

#[test]
fn test_dependencies_round_trip_in_order() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry
        .set_dependencies(t(1), Some(&[t(3), t(2)]))
        .unwrap();
    assert_eq!(registry.dependencies_for(t(1)), vec![t(3), t(2)]);

    registry.set_dependencies(t(1), None).unwrap();
    assert!(registry.dependencies_for(t(1)).is_empty());
}

#[test]
fn test_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let mut registry = open_registry(&temp);
        registry.bind(t(1), "ticket/1").unwrap();
        registry
            .set_remote_branch("ticket/1", "u/alice/ticket/1")
            .unwrap();
        registry.set_dependencies(t(1), Some(&[t(2)])).unwrap();
    }
    let registry = open_registry(&temp);
    assert_eq!(registry.branch_for_ticket(t(1)), Some("ticket/1"));
    assert_eq!(registry.ticket_for_branch("ticket/1"), Some(t(1)));
    assert_eq!(
        registry.remote_branch_for("ticket/1"),
        Some("u/alice/ticket/1")
    );
    assert_eq!(registry.dependencies_for(t(1)), vec![t(2)]);
}

#[test]
fn test_records_are_replaced_not_appended() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry.bind(t(1), "ticket/1").unwrap();
    registry.bind(t(1), "ticket/1b").unwrap();

    // No temp files linger after a completed write.
    let leftovers: Vec<_> = std::fs::read_dir(registry.dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_clear_remote_branch() {
    let temp = TempDir::new().unwrap();
    let mut registry = open_registry(&temp);
    registry.set_remote_branch("b", "u/alice/b").unwrap();
    registry.clear_remote_branch("b").unwrap();
    assert_eq!(registry.remote_branch_for("b"), None);
    // Clearing twice is fine.
    registry.clear_remote_branch("b").unwrap();
}

#[test]
fn test_legacy_records_migrate_forward() {
    let temp = TempDir::new().unwrap();
    let legacy = temp.path().join(".tug");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(
        legacy.join("ticket_to_branch.json"),
        r#"{"1":"ticket/1"}"#,
    )
    .unwrap();
    std::fs::write(
        legacy.join("branch_to_ticket.json"),
        r#"{"ticket/1":1}"#,
    )
    .unwrap();

    let registry = open_registry(&temp);
    assert_eq!(registry.branch_for_ticket(t(1)), Some("ticket/1"));
    assert!(!legacy.join("ticket_to_branch.json").exists());
    // The empty legacy directory is removed as part of the migration.
    assert!(!legacy.exists());
}

#[test]
fn test_corrupt_record_is_an_error_not_a_wipe() {
    let temp = TempDir::new().unwrap();
    let git_dir = temp.path().join(".git");
    std::fs::create_dir_all(git_dir.join("tug")).unwrap();
    std::fs::write(git_dir.join("tug/dependencies.json"), "{not json").unwrap();
    assert!(Registry::open(&git_dir, temp.path()).is_err());
}

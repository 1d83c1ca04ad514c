// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Name classification for tickets and branches.
//!
//! Ticket references (`123`, `#123`, `ticket/123`) and branch names are kept
//! apart: the bare forms are refused as branch names, and only the canonical
//! `ticket/<n>` spelling lives in both namespaces, because it is the default
//! branch name handed out for a ticket (commands resolve it as a ticket
//! reference first). Branch names must satisfy the backend's reference
//! grammar before they are ever passed to a git primitive.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::ticket::TicketId;

// Pre-compiled regexes. Using match with unreachable! since these patterns
// are hard-coded and known-valid.
static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"^(?:#|ticket/)?([1-9][0-9]*)$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });
static BARE_TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"^#?[1-9][0-9]*$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });
static REF_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"^[^\x00-\x20\x7f~^:?*\[\\]+$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });
static USER_BRANCH_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"^u/([^/]+)/") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

/// Prefix under which abandoned branches are parked.
pub const TRASH_PREFIX: &str = "trash/";

// Names that would collide with pseudo-refs or command keywords.
const RESERVED: &[&str] = &["HEAD", "FETCH_HEAD", "MERGE_HEAD", "dependencies"];

/// Returns whether `name` is a syntactically valid ticket reference.
pub fn is_ticket_name(name: &str) -> bool {
    TICKET_RE.is_match(name)
}

/// Parses a ticket reference (`123`, `#123` or `ticket/123`).
pub fn ticket_from_name(name: &str) -> Result<TicketId> {
    let caps = TICKET_RE
        .captures(name)
        .ok_or_else(|| Error::InvalidTicketName(name.to_string()))?;
    let id: u64 = caps[1]
        .parse()
        .map_err(|_| Error::InvalidTicketName(name.to_string()))?;
    Ok(TicketId::new(id))
}

/// Returns whether `name` satisfies the git reference-name grammar.
///
/// Mirrors the rules git itself enforces: no control characters or
/// `space ~ ^ : ? * [ \`, no leading or trailing `/` or `.`, no `..`,
/// `//`, `/.` or `@{` sequences, and no trailing `.lock`.
pub fn is_reference_name(name: &str) -> bool {
    REF_CHARS_RE.is_match(name)
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.starts_with('.')
        && !name.ends_with('.')
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("/.")
        && !name.contains("@{")
}

/// Returns whether `name` is acceptable as a local branch name.
///
/// Bare ticket references (`123`, `#123`) are refused so the two namespaces
/// can never be confused when a command accepts either. The canonical
/// `ticket/<n>` spelling is allowed: it is the default branch name created
/// for a ticket.
pub fn is_local_branch_name(name: &str) -> bool {
    is_reference_name(name) && !BARE_TICKET_RE.is_match(name) && !RESERVED.contains(&name)
}

/// Returns whether `name` is acceptable as a remote branch name.
pub fn is_remote_branch_name(name: &str) -> bool {
    is_local_branch_name(name)
}

/// Returns whether `name` is the name of an abandoned (trash) branch.
pub fn is_trash_name(name: &str) -> bool {
    match name.strip_prefix(TRASH_PREFIX) {
        Some(rest) => !rest.is_empty() && is_reference_name(name),
        None => false,
    }
}

/// Default local branch name for a ticket.
pub fn ticket_branch_name(ticket: TicketId) -> String {
    format!("ticket/{ticket}")
}

/// Default remote branch name inside a user's scope.
pub fn user_branch_name(username: &str, branch: &str) -> String {
    format!("u/{username}/{branch}")
}

/// Extracts the username from a `u/<user>/...` remote branch name.
pub fn user_scope(remote_branch: &str) -> Option<&str> {
    USER_BRANCH_RE
        .captures(remote_branch)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;

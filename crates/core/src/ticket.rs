// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket identifiers and tracker-side ticket attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a ticket on the remote tracker.
///
/// Tickets are owned by the tracker; this core only references them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Wraps a raw ticket number. Validation of user input happens in
    /// [`crate::names::ticket_from_name`].
    pub const fn new(id: u64) -> Self {
        TicketId(id)
    }

    /// Returns the raw ticket number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subset of tracker attributes this tool reads and writes.
///
/// The branch field and the dependency list are accessed through their own
/// tracker operations and are not part of this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketAttributes {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TicketAttributes {
    /// Creates attributes with a summary only.
    pub fn with_summary(summary: impl Into<String>) -> Self {
        TicketAttributes {
            summary: summary.into(),
            ..TicketAttributes::default()
        }
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote ticket service capability.
//!
//! The tracker owns tickets; this core only reads and writes the handful of
//! fields it cares about. [`Tracker::set_branch_field`] is the
//! compare-and-swap primitive the sync engine relies on for its
//! optimistic-concurrency guarantees: it must fail distinctly when the
//! field no longer holds the expected value.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::ticket::{TicketAttributes, TicketId};

/// Ticket service operations consumed by the engine.
pub trait Tracker {
    /// Returns whether the ticket exists on the tracker.
    fn exists(&self, ticket: TicketId) -> Result<bool>;

    /// Reads the ticket's attributes.
    fn get_attributes(&self, ticket: TicketId) -> Result<TicketAttributes>;

    /// Writes the ticket's attributes, optionally notifying watchers.
    fn set_attributes(
        &self,
        ticket: TicketId,
        attributes: &TicketAttributes,
        notify: bool,
    ) -> Result<()>;

    /// Reads the ticket's dependency list, in tracker order.
    fn dependencies(&self, ticket: TicketId) -> Result<Vec<TicketId>>;

    /// Replaces the ticket's dependency list.
    fn set_dependencies(&self, ticket: TicketId, dependencies: &[TicketId]) -> Result<()>;

    /// Reads the branch field, `None` when unset.
    fn branch_field(&self, ticket: TicketId) -> Result<Option<String>>;

    /// Compare-and-swap on the branch field.
    ///
    /// Fails with [`Error::BranchFieldRace`] when the field no longer holds
    /// `expected` (with `None` meaning "currently unset").
    fn set_branch_field(
        &self,
        ticket: TicketId,
        value: &str,
        expected: Option<&str>,
    ) -> Result<()>;

    /// Creates a new ticket and returns its identifier.
    fn create_ticket(&self, attributes: &TicketAttributes) -> Result<TicketId>;
}

#[derive(Debug, Default, Clone)]
struct MemoryTicket {
    attributes: TicketAttributes,
    branch: Option<String>,
    dependencies: Vec<TicketId>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    tickets: BTreeMap<u64, MemoryTicket>,
}

/// An in-memory tracker, playing the role of the remote service in tests.
///
/// Shared between sessions through `Rc` so multi-user scenarios can exercise
/// the concurrency protocol against one "server".
#[derive(Debug, Default)]
pub struct MemoryTracker {
    state: Mutex<MemoryState>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        MemoryTracker::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn with_ticket<T>(
        &self,
        ticket: TicketId,
        f: impl FnOnce(&mut MemoryTicket) -> Result<T>,
    ) -> Result<T> {
        self.with_state(|state| {
            let entry = state
                .tickets
                .get_mut(&ticket.get())
                .ok_or(Error::NoSuchTicket(ticket.get()))?;
            f(entry)
        })
    }
}

impl Tracker for MemoryTracker {
    fn exists(&self, ticket: TicketId) -> Result<bool> {
        Ok(self.with_state(|state| state.tickets.contains_key(&ticket.get())))
    }

    fn get_attributes(&self, ticket: TicketId) -> Result<TicketAttributes> {
        self.with_ticket(ticket, |entry| Ok(entry.attributes.clone()))
    }

    fn set_attributes(
        &self,
        ticket: TicketId,
        attributes: &TicketAttributes,
        _notify: bool,
    ) -> Result<()> {
        self.with_ticket(ticket, |entry| {
            entry.attributes = attributes.clone();
            Ok(())
        })
    }

    fn dependencies(&self, ticket: TicketId) -> Result<Vec<TicketId>> {
        self.with_ticket(ticket, |entry| Ok(entry.dependencies.clone()))
    }

    fn set_dependencies(&self, ticket: TicketId, dependencies: &[TicketId]) -> Result<()> {
        self.with_ticket(ticket, |entry| {
            entry.dependencies = dependencies.to_vec();
            Ok(())
        })
    }

    fn branch_field(&self, ticket: TicketId) -> Result<Option<String>> {
        self.with_ticket(ticket, |entry| Ok(entry.branch.clone()))
    }

    fn set_branch_field(
        &self,
        ticket: TicketId,
        value: &str,
        expected: Option<&str>,
    ) -> Result<()> {
        self.with_ticket(ticket, |entry| {
            if entry.branch.as_deref() != expected {
                return Err(Error::BranchFieldRace {
                    ticket: ticket.get(),
                    expected: expected.unwrap_or("(unset)").to_string(),
                    actual: entry.branch.clone().unwrap_or_else(|| "(unset)".to_string()),
                });
            }
            entry.branch = Some(value.to_string());
            Ok(())
        })
    }

    fn create_ticket(&self, attributes: &TicketAttributes) -> Result<TicketId> {
        Ok(self.with_state(|state| {
            state.next_id += 1;
            let id = state.next_id;
            state.tickets.insert(
                id,
                MemoryTicket {
                    attributes: attributes.clone(),
                    ..MemoryTicket::default()
                },
            );
            TicketId::new(id)
        }))
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;

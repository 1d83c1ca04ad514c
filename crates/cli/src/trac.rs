// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the ticket tracker's JSON-RPC interface.
//!
//! One POST per operation. Tracker-side failures come back as JSON-RPC
//! error objects; the codes below are mapped onto the engine's error
//! taxonomy so the sync engine can react to a lost compare-and-swap.

use serde_json::{json, Value};

use tug_core::{Error, Result, TicketAttributes, TicketId, Tracker};

// Error codes the tracker uses in its JSON-RPC error objects.
const CODE_NOT_FOUND: i64 = 404;
const CODE_CONFLICT: i64 = 409;

pub struct HttpTracker {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpTracker {
    pub fn new(endpoint: &str) -> Self {
        HttpTracker {
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = request_body(method, params);
        tracing::debug!(method, "tracker rpc");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| Error::Rpc(e.to_string()))?;
        let payload: Value = response.json().map_err(|e| Error::Rpc(e.to_string()))?;
        if let Some(error) = payload.get("error").filter(|error| !error.is_null()) {
            return Err(rpc_error(method, error));
        }
        Ok(payload.get("result").cloned().unwrap_or(Value::Null))
    }
}

fn request_body(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 0,
        "method": method,
        "params": params,
    })
}

fn rpc_error(method: &str, error: &Value) -> Error {
    let code = error.get("code").and_then(Value::as_i64);
    let data = error.get("data");
    match code {
        Some(CODE_NOT_FOUND) => {
            if let Some(ticket) = data.and_then(|d| d.get("ticket")).and_then(Value::as_u64) {
                return Error::NoSuchTicket(ticket);
            }
        }
        Some(CODE_CONFLICT) => {
            if let Some(data) = data {
                let ticket = data.get("ticket").and_then(Value::as_u64).unwrap_or(0);
                let expected = field_or_unset(data.get("expected"));
                let actual = field_or_unset(data.get("actual"));
                return Error::BranchFieldRace {
                    ticket,
                    expected,
                    actual,
                };
            }
        }
        _ => {}
    }
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Error::Rpc(format!("{method}: {message}"))
}

fn field_or_unset(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or("(unset)")
        .to_string()
}

impl Tracker for HttpTracker {
    fn exists(&self, ticket: TicketId) -> Result<bool> {
        let result = self.call("ticket.exists", json!([ticket.get()]))?;
        Ok(result.as_bool().unwrap_or(false))
    }

    fn get_attributes(&self, ticket: TicketId) -> Result<TicketAttributes> {
        let result = self.call("ticket.attributes", json!([ticket.get()]))?;
        serde_json::from_value(result).map_err(|e| Error::Rpc(e.to_string()))
    }

    fn set_attributes(
        &self,
        ticket: TicketId,
        attributes: &TicketAttributes,
        notify: bool,
    ) -> Result<()> {
        self.call(
            "ticket.set_attributes",
            json!([ticket.get(), attributes, notify]),
        )?;
        Ok(())
    }

    fn dependencies(&self, ticket: TicketId) -> Result<Vec<TicketId>> {
        let result = self.call("ticket.dependencies", json!([ticket.get()]))?;
        let raw: Vec<u64> =
            serde_json::from_value(result).map_err(|e| Error::Rpc(e.to_string()))?;
        Ok(raw.into_iter().map(TicketId::new).collect())
    }

    fn set_dependencies(&self, ticket: TicketId, dependencies: &[TicketId]) -> Result<()> {
        let raw: Vec<u64> = dependencies.iter().map(|d| d.get()).collect();
        self.call("ticket.set_dependencies", json!([ticket.get(), raw]))?;
        Ok(())
    }

    fn branch_field(&self, ticket: TicketId) -> Result<Option<String>> {
        let result = self.call("ticket.branch", json!([ticket.get()]))?;
        Ok(result.as_str().map(str::to_string))
    }

    fn set_branch_field(
        &self,
        ticket: TicketId,
        value: &str,
        expected: Option<&str>,
    ) -> Result<()> {
        self.call(
            "ticket.set_branch",
            json!([ticket.get(), value, expected]),
        )?;
        Ok(())
    }

    fn create_ticket(&self, attributes: &TicketAttributes) -> Result<TicketId> {
        let result = self.call("ticket.create", json!([attributes]))?;
        let id = result
            .as_u64()
            .ok_or_else(|| Error::Rpc("ticket.create returned no id".to_string()))?;
        Ok(TicketId::new(id))
    }
}

/// Stand-in used when no tracker URL is configured: every operation fails
/// with the same actionable message, so purely local commands keep
/// working.
pub struct UnconfiguredTracker;

impl UnconfiguredTracker {
    fn unavailable<T>(&self) -> Result<T> {
        Err(Error::Config(
            "no tracker URL configured\n  hint: run 'tug config set tracker-url <url>'"
                .to_string(),
        ))
    }
}

impl Tracker for UnconfiguredTracker {
    fn exists(&self, _ticket: TicketId) -> Result<bool> {
        self.unavailable()
    }

    fn get_attributes(&self, _ticket: TicketId) -> Result<TicketAttributes> {
        self.unavailable()
    }

    fn set_attributes(
        &self,
        _ticket: TicketId,
        _attributes: &TicketAttributes,
        _notify: bool,
    ) -> Result<()> {
        self.unavailable()
    }

    fn dependencies(&self, _ticket: TicketId) -> Result<Vec<TicketId>> {
        self.unavailable()
    }

    fn set_dependencies(&self, _ticket: TicketId, _dependencies: &[TicketId]) -> Result<()> {
        self.unavailable()
    }

    fn branch_field(&self, _ticket: TicketId) -> Result<Option<String>> {
        self.unavailable()
    }

    fn set_branch_field(
        &self,
        _ticket: TicketId,
        _value: &str,
        _expected: Option<&str>,
    ) -> Result<()> {
        self.unavailable()
    }

    fn create_ticket(&self, _attributes: &TicketAttributes) -> Result<TicketId> {
        self.unavailable()
    }
}

#[cfg(test)]
#[path = "trac_tests.rs"]
mod tests;

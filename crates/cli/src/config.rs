// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the CLI.
//!
//! Stored as TOML at `<git-dir>/tug/config.toml`, next to the registry
//! records, so a clone of the working copy starts from a clean slate.
//! Environment variables (`TUG_USERNAME`, `TUG_TRUNK`, `TUG_REMOTE`,
//! `TUG_TRACKER_URL`) override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tug_core::{Error, Result, SessionConfig};

const CONFIG_FILE: &str = "config.toml";

/// Persisted configuration, all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Username scoping default remote branch names.
    pub username: Option<String>,
    /// The repository's mainline branch (default: "main").
    pub trunk: Option<String>,
    /// Git remote used for fetch/push (default: "origin").
    pub remote: Option<String>,
    /// Endpoint of the ticket tracker's RPC interface.
    pub tracker_url: Option<String>,
}

impl Config {
    /// Path of the config file inside the git metadata directory.
    pub fn path(git_dir: &Path) -> PathBuf {
        git_dir.join("tug").join(CONFIG_FILE)
    }

    /// Loads the configuration, returning defaults when the file is
    /// absent.
    pub fn load(git_dir: &Path) -> Result<Self> {
        let path = Self::path(git_dir);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Writes the configuration back to disk.
    pub fn save(&self, git_dir: &Path) -> Result<()> {
        let path = Self::path(git_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(&path, data)?;
        Ok(())
    }

    /// Sets one key, rejecting unknown names.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "username" => self.username = Some(value.to_string()),
            "trunk" => self.trunk = Some(value.to_string()),
            "remote" => self.remote = Some(value.to_string()),
            "tracker-url" | "tracker_url" => self.tracker_url = Some(value.to_string()),
            _ => {
                return Err(Error::Config(format!(
                    "unknown key '{key}'\n  hint: valid keys are: username, trunk, remote, tracker-url"
                )))
            }
        }
        Ok(())
    }

    pub fn username(&self) -> String {
        env_override("TUG_USERNAME")
            .or_else(|| self.username.clone())
            .or_else(|| env_override("USER"))
            .unwrap_or_else(|| "dev".to_string())
    }

    pub fn trunk(&self) -> String {
        env_override("TUG_TRUNK")
            .or_else(|| self.trunk.clone())
            .unwrap_or_else(|| "main".to_string())
    }

    pub fn remote(&self) -> String {
        env_override("TUG_REMOTE")
            .or_else(|| self.remote.clone())
            .unwrap_or_else(|| "origin".to_string())
    }

    pub fn tracker_url(&self) -> Option<String> {
        env_override("TUG_TRACKER_URL").or_else(|| self.tracker_url.clone())
    }

    /// The core-facing view of this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            username: self.username(),
            trunk: self.trunk(),
        }
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

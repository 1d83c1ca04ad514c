// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace member holding the CLI spec tests.
//!
//! The test files under `cli/` are compiled as `[[test]]` targets of the
//! `tug` crate (see `crates/cli/Cargo.toml`); this library only anchors the
//! directory in the workspace.

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;

#[test]
fn test_capitalized() {
    assert_eq!(capitalized("yes"), "Yes");
    assert_eq!(capitalized("cancel"), "Cancel");
    assert_eq!(capitalized(""), "");
}

// The interactive paths (confirm/select/get_input) read from stdin and are
// exercised through the scripted prompt in the core crate's tests; here we
// only check the pieces that are pure.
#[test]
fn test_terminal_prompt_constructs() {
    let _prompt = TerminalPrompt::new();
}

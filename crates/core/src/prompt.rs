// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The interactive prompt capability.
//!
//! The engine never touches a terminal directly; every question goes through
//! this trait. The CLI ships a terminal implementation, tests use
//! [`ScriptedPrompt`] with canned answers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use crate::error::Result;

/// Interactive prompt operations consumed by the engine.
pub trait Prompt {
    /// Displays a message to the user.
    fn show(&self, text: &str);

    /// Asks a yes/no question, returning `default` on an empty answer.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Asks the user to pick one of `options`, returning the chosen option.
    /// An empty or unrecognized answer selects `options[default]`.
    fn select(&self, prompt: &str, options: &[&str], default: usize) -> Result<String>;

    /// Reads a free-form line of input.
    fn get_input(&self, prompt: &str) -> Result<String>;

    /// Opens `path` in the user's editor and waits for it to close.
    fn edit(&self, path: &Path) -> Result<()>;
}

/// A prompt that replays a queue of prepared answers.
///
/// Missing answers resolve to the default of the question being asked, so a
/// test only scripts the decisions it cares about. Everything shown to the
/// user is recorded for assertions.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    shown: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        ScriptedPrompt::default()
    }

    /// Queues an answer for the next unanswered question.
    pub fn push(&self, answer: &str) {
        self.answers.borrow_mut().push_back(answer.to_string());
    }

    /// Queues several answers at once.
    pub fn extend<'a>(&self, answers: impl IntoIterator<Item = &'a str>) {
        for answer in answers {
            self.push(answer);
        }
    }

    /// Everything displayed through `show` so far.
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    /// Returns whether any shown message contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.shown.borrow().iter().any(|m| m.contains(needle))
    }

    fn pop(&self) -> Option<String> {
        self.answers.borrow_mut().pop_front()
    }
}

impl Prompt for ScriptedPrompt {
    fn show(&self, text: &str) {
        self.shown.borrow_mut().push(text.to_string());
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(match self.pop() {
            Some(answer) => match answer.to_lowercase().as_str() {
                "y" | "yes" => true,
                "n" | "no" => false,
                _ => default,
            },
            None => default,
        })
    }

    fn select(&self, _prompt: &str, options: &[&str], default: usize) -> Result<String> {
        let fallback = options.get(default).copied().unwrap_or_default();
        let answer = match self.pop() {
            Some(answer) if !answer.is_empty() => answer.to_lowercase(),
            _ => return Ok(fallback.to_string()),
        };
        let matches: Vec<&str> = options
            .iter()
            .copied()
            .filter(|option| option.to_lowercase().starts_with(&answer))
            .collect();
        Ok(match matches.as_slice() {
            [only] => (*only).to_string(),
            _ => fallback.to_string(),
        })
    }

    fn get_input(&self, _prompt: &str) -> Result<String> {
        Ok(self.pop().unwrap_or_default())
    }

    fn edit(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal implementation of the prompt capability.
//!
//! Questions go to stdout, answers come from stdin, one line at a time.
//! The default answer is printed capitalized, and an empty line picks it.

use std::io::{BufRead, Write};
use std::path::Path;
use std::process::Command;

use tug_core::{Error, Prompt, Result};

#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt
    }

    fn read_line(&self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            // EOF: behave as if the user accepted the default.
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompt for TerminalPrompt {
    fn show(&self, text: &str) {
        println!("{text}");
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let options = if default { "[Yes/no]" } else { "[yes/No]" };
        loop {
            print!("{prompt} {options} ");
            std::io::stdout().flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(default);
            };
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer yes or no."),
            }
        }
    }

    fn select(&self, prompt: &str, options: &[&str], default: usize) -> Result<String> {
        let rendered: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                if index == default {
                    capitalized(option)
                } else {
                    (*option).to_string()
                }
            })
            .collect();
        loop {
            print!("{prompt} [{}] ", rendered.join("/"));
            std::io::stdout().flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(options.get(default).copied().unwrap_or_default().to_string());
            };
            if answer.is_empty() {
                return Ok(options.get(default).copied().unwrap_or_default().to_string());
            }
            let answer = answer.to_lowercase();
            let matches: Vec<&str> = options
                .iter()
                .copied()
                .filter(|option| option.to_lowercase().starts_with(&answer))
                .collect();
            if let [only] = matches.as_slice() {
                return Ok((*only).to_string());
            }
            println!("Please pick one of: {}.", options.join(", "));
        }
    }

    fn get_input(&self, prompt: &str) -> Result<String> {
        print!("{prompt} ");
        std::io::stdout().flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn edit(&self, path: &Path) -> Result<()> {
        let editor = std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .unwrap_or_else(|_| "vi".to_string());
        let status = Command::new(&editor).arg(path).status()?;
        if !status.success() {
            return Err(Error::Config(format!("editor '{editor}' exited with an error")));
        }
        Ok(())
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "term_tests.rs"]
mod tests;

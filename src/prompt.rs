// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Yes/no confirmation asked before destructive or money-moving actions.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// Reads the answer from stdin; the question goes to stderr.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        eprint!("{} [y/N] ", message);
        io::stderr().flush().ok();
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(matches!(
            line.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

/// Answers every question the same way (`--yes`, scripted use, tests).
pub struct Fixed(pub bool);

impl Prompt for Fixed {
    fn confirm(&mut self, _message: &str) -> Result<bool> {
        Ok(self.0)
    }
}

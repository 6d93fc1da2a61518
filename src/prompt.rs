// src/prompt.rs

//! y/N confirmation prompts
//!
//! Only `y` or `Y` (surrounding whitespace ignored) counts as consent. An
//! empty answer, end of input or anything else is a refusal.

use crate::error::Result;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

/// Asks the user a yes/no question
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Whether an answer line means yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// Write `question`, read one line, and interpret it
pub fn ask_yes_no<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Prompt over any reader/writer pair
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt on the terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        ask_yes_no(question, &mut self.input, &mut self.output)
    }
}

/// Answers every question the same way without asking
#[derive(Debug, Clone, Copy)]
pub struct AssumeAnswer(pub bool);

impl Confirm for AssumeAnswer {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

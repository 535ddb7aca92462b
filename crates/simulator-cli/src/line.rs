// crates/simulator-cli/src/line.rs
// ============================================================================
// Module: Interpreter Line Protocol
// Description: Parses one `interpreter` input line into a step command.
// Purpose: Accept the same `run --step`/`run --file` forms as the CLI.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The `interpreter` subcommand reads commands from stdin, one per line:
//!
//! ```text
//! run --step '{"endpoint":"key","method":"create",...}'
//! run --file ./plan/step.json
//! ```
//!
//! Lines are split into words with shell-like quoting: single quotes keep
//! their content verbatim, double quotes honor backslash escapes, and a
//! backslash outside quotes escapes the next character. Blank lines carry no
//! command.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Command carried by one interpreter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLine {
    /// Inline step JSON from `--step`.
    pub step: Option<String>,
    /// Step file path from `--file`.
    pub file: Option<PathBuf>,
}

/// Errors raised while parsing an interpreter line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// A quoted word was not closed before the end of the line.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    /// The line ends with a lone backslash.
    #[error("dangling escape at end of line")]
    DanglingEscape,
    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// A flag is not recognized.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    /// A flag was given without its value.
    #[error("missing value for {0}")]
    MissingValue(String),
    /// A flag was given more than once.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses one interpreter line; returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns [`LineError`] when the line cannot be split or names an unknown
/// command or flag.
pub fn parse_line(line: &str) -> Result<Option<RunLine>, LineError> {
    let words = split_words(line)?;
    let mut words = words.into_iter();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    if command != "run" {
        return Err(LineError::UnknownCommand(command));
    }

    let mut run = RunLine {
        step: None,
        file: None,
    };
    while let Some(word) = words.next() {
        let (flag, inline_value) = match word.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (word, None),
        };
        let value = match inline_value {
            Some(value) => value,
            None => words.next().ok_or_else(|| LineError::MissingValue(flag.clone()))?,
        };
        match flag.as_str() {
            "--step" => set_once(&mut run.step, value, &flag)?,
            "--file" => set_once(&mut run.file, PathBuf::from(value), &flag)?,
            _ => return Err(LineError::UnknownFlag(flag)),
        }
    }
    Ok(Some(run))
}

/// Splits a line into words using shell-like quoting rules.
///
/// # Errors
///
/// Returns [`LineError`] for an unterminated quote or a trailing backslash.
pub fn split_words(line: &str) -> Result<Vec<String>, LineError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(LineError::UnterminatedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(LineError::UnterminatedQuote('"')),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(LineError::UnterminatedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next().ok_or(LineError::DanglingEscape)?);
            }
            ch if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            ch => {
                in_word = true;
                current.push(ch);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Stores `value` in `slot`, rejecting a second occurrence of `flag`.
fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), LineError> {
    if slot.is_some() {
        return Err(LineError::DuplicateFlag(flag.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

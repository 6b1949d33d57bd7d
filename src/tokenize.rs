// src/tokenize.rs

//! Splitting a command line into an argument vector.
//!
//! No shell is involved: pipes, redirects, globs and `$VARS` reach the program
//! as literal argument text. [`ShellWords`] is the default and understands
//! quoting; [`Whitespace`] keeps the older behaviour of splitting on blanks
//! only.

use std::fmt::Debug;

use crate::errors::ParseError;

/// Turns a command line into the argument vector handed to the launcher.
///
/// An empty vector is a valid result; the launcher decides what to do with it.
pub trait Tokenizer: Send + Sync + Debug {
    fn split(&self, line: &str) -> Result<Vec<String>, ParseError>;
}

/// Quote-aware splitting following POSIX shell-word rules.
///
/// Single quotes, double quotes and backslash escapes group and escape
/// characters; an unterminated quote is a [`ParseError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellWords;

impl Tokenizer for ShellWords {
    fn split(&self, line: &str) -> Result<Vec<String>, ParseError> {
        Ok(shell_words::split(line)?)
    }
}

/// Splits on runs of whitespace. Never fails; quotes are ordinary characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whitespace;

impl Tokenizer for Whitespace {
    fn split(&self, line: &str) -> Result<Vec<String>, ParseError> {
        Ok(line.split_whitespace().map(str::to_owned).collect())
    }
}

/// Split `line` with the default [`ShellWords`] tokenizer.
pub fn split(line: &str) -> Result<Vec<String>, ParseError> {
    ShellWords.split(line)
}

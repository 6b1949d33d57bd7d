// src/errors.rs

//! Crate-wide error type.
//!
//! Every failure of a launch surfaces as an [`ExecError`]. The type is
//! `Clone` so that test doubles can hand out the same configured error on
//! every call; OS errors are therefore shared behind an `Arc`.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use thiserror::Error;

/// Error produced by a failing `pre` hook, shared so `ExecError` stays `Clone`.
pub type HookError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A command line could not be split into an argument vector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed command line: {reason}")]
pub struct ParseError {
    reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<shell_words::ParseError> for ParseError {
    fn from(err: shell_words::ParseError) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Error, Debug, Clone)]
pub enum ExecError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The command line split into zero arguments.
    #[error("invalid command")]
    InvalidCommand,

    #[error("executable not found: {program}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to start {program}")]
    Start {
        program: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("pre-start hook failed")]
    Hook(#[source] HookError),

    #[error("failed to wait for process")]
    Wait(#[source] Arc<io::Error>),

    #[error("process exited unsuccessfully ({0})")]
    Exit(ExitStatus),

    #[error("failed to open log file {path:?}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}

impl ExecError {
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, ExecError::InvalidCommand)
    }

    /// Exit code of the child, when it exited with one.
    ///
    /// Returns `None` for every other variant, and for processes that were
    /// terminated by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::Exit(status) => status.code(),
            _ => None,
        }
    }

    pub(crate) fn hook(err: anyhow::Error) -> Self {
        let boxed: Box<dyn std::error::Error + Send + Sync + 'static> = err.into();
        ExecError::Hook(Arc::from(boxed))
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;

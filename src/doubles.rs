// src/doubles.rs

//! Fixed-return stand-ins for [`Runner`] and [`Prober`].
//!
//! Meant for callers' own tests: code written against the facade traits can
//! be exercised without spawning anything.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::errors::{ExecError, Result};
use crate::facade::{ProbeOutput, Prober, Runner};

/// Returns `err` (or success) from every `run`.
#[derive(Debug, Clone, Default)]
pub struct DummyRunner {
    pub err: Option<ExecError>,
}

impl DummyRunner {
    pub fn failing(err: ExecError) -> Self {
        Self { err: Some(err) }
    }
}

impl Runner for DummyRunner {
    fn run<'a>(
        &'a self,
        _cancel: &'a CancellationToken,
        _cmd: &'a str,
        _log_file: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let result = match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }
}

/// Returns the configured output and error from every `probe`.
#[derive(Debug, Clone, Default)]
pub struct DummyProber {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub err: Option<ExecError>,
}

impl Prober for DummyProber {
    fn probe<'a>(
        &'a self,
        _cancel: &'a CancellationToken,
        _cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = ProbeOutput> + Send + 'a>> {
        let output = ProbeOutput {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
            result: match &self.err {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            },
        };
        Box::pin(async move { output })
    }
}

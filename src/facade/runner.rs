// src/facade/runner.rs

//! Run a command with its output going to a log file.

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{ExecError, Result};
use crate::exec::{Cmd, Output, Process, pre};

use super::Std;

/// Runs a command and sends its output to a log file.
pub trait Runner: Send + Sync {
    /// Start `cmd` and wait for it to exit.
    ///
    /// `log_file` is created or truncated and receives stdout and stderr
    /// merged. Cancelling `cancel` terminates the process while it runs.
    fn run<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        cmd: &'a str,
        log_file: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

impl Runner for Std {
    fn run<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        cmd: &'a str,
        log_file: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let log = open_log(log_file)?;
            debug!(log_file = %log_file.display(), "log file opened");

            // The hook owns the handle; it is closed once `exec` drops its options.
            let wire = move |p: &mut Process| -> anyhow::Result<()> {
                let stdout = log.try_clone().context("duplicating log file handle")?;
                let stderr = log.try_clone().context("duplicating log file handle")?;
                p.set_stdout(Output::File(stdout));
                p.set_stderr(Output::File(stderr));
                Ok(())
            };

            Cmd::new(cmd).exec(cancel, [pre(wire)]).await
        })
    }
}

fn open_log(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    options.open(path).map_err(|source| ExecError::LogFile {
        path: path.to_path_buf(),
        source: Arc::new(source),
    })
}

// src/exec/launcher.rs

//! The launcher: tokenize, resolve, start, then race exit against cancellation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{ExecError, Result};
use crate::tokenize::{ShellWords, Tokenizer};

use super::options::{ExecOption, Hooks, Stage};
use super::process::Process;

/// How long captured output may stay open after a cancelled process is gone.
const CANCEL_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// An unsplit command line, e.g. `"ls -la /tmp"`.
///
/// The line is not run through a shell. It is split by the configured
/// [`Tokenizer`] on every launch, so a `Cmd` can be executed repeatedly.
#[derive(Clone)]
pub struct Cmd {
    line: String,
    tokenizer: Arc<dyn Tokenizer>,
}

impl Cmd {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            tokenizer: Arc::new(ShellWords),
        }
    }

    /// Split the line with `tokenizer` instead of [`ShellWords`].
    pub fn with_tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Arc::new(tokenizer);
        self
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// The argument vector this command would launch.
    pub fn argv(&self) -> Result<Vec<String>> {
        Ok(self.tokenizer.split(&self.line)?)
    }

    /// Run the command to completion, or until `cancel` fires.
    ///
    /// Hooks from `options` are applied on top of the defaults (see
    /// [`Hooks`]). On cancellation the exit hook runs once against the live
    /// process and the call then waits for the process to go away, so the
    /// returned error reflects how it ended, typically killed by a signal.
    /// If the process had already exited and only its captured output was
    /// still open (held by a background grandchild), the exit hook is skipped
    /// and that output is abandoned shortly after.
    ///
    /// Nothing spawned for the launch outlives this call.
    pub async fn exec<I>(&self, cancel: &CancellationToken, options: I) -> Result<()>
    where
        I: IntoIterator<Item = ExecOption>,
    {
        let argv = self.argv()?;
        let Some((name, args)) = argv.split_first() else {
            debug!(line = %self.line(), "command line has no arguments");
            return Err(ExecError::InvalidCommand);
        };

        let program = which::which(name).map_err(|source| ExecError::NotFound {
            program: name.clone(),
            source,
        })?;
        debug!(command = %name, program = %program.display(), "resolved executable");

        let hooks = Hooks::from_options(options);
        let mut process = Process::new(program, args);

        if let Some(pre) = hooks.get(Stage::Pre) {
            debug!(stage = %Stage::Pre, "applying hook");
            pre.call(&mut process).map_err(ExecError::hook)?;
        }

        process.start().map_err(|source| ExecError::Start {
            program: process.program().display().to_string(),
            source: Arc::new(source),
        })?;
        info!(
            program = %process.program().display(),
            args = ?process.args(),
            pid = process.id(),
            "process started"
        );

        if let Some(post) = hooks.get(Stage::Post) {
            debug!(stage = %Stage::Post, "applying hook");
            if let Err(err) = post.call(&mut process) {
                warn!(
                    program = %process.program().display(),
                    error = %err,
                    "post-start hook failed; ignoring"
                );
            }
        }

        let waited = tokio::select! {
            biased;

            status = process.wait() => status,

            _ = cancel.cancelled() => {
                if process.has_exited() {
                    debug!(
                        program = %process.program().display(),
                        "cancelled after exit; only output remains open"
                    );
                } else {
                    info!(
                        program = %process.program().display(),
                        pid = process.id(),
                        "cancellation requested; applying exit hook"
                    );
                    if let Some(exit) = hooks.get(Stage::Exit) {
                        if let Err(err) = exit.call(&mut process) {
                            warn!(
                                program = %process.program().display(),
                                error = %err,
                                "exit hook failed"
                            );
                        }
                    }
                }
                process.wait_within(CANCEL_DRAIN_GRACE).await
            }
        };

        let status = waited.map_err(|e| ExecError::Wait(Arc::new(e)))?;
        info!(
            program = %process.program().display(),
            exit_code = status.code(),
            success = status.success(),
            "process exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Exit(status))
        }
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd")
            .field("line", &self.line)
            .field("tokenizer", &self.tokenizer)
            .finish()
    }
}

impl From<&str> for Cmd {
    fn from(line: &str) -> Self {
        Cmd::new(line)
    }
}

impl From<String> for Cmd {
    fn from(line: String) -> Self {
        Cmd::new(line)
    }
}

/// Shorthand for `Cmd::new(line).exec(cancel, options)`.
pub async fn exec<I>(line: &str, cancel: &CancellationToken, options: I) -> Result<()>
where
    I: IntoIterator<Item = ExecOption>,
{
    Cmd::new(line).exec(cancel, options).await
}

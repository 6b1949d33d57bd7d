// src/lib.rs

//! Launch external processes with composable lifecycle hooks, and tie their
//! lifetime to a [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! ```no_run
//! # async fn demo() -> ctxexec::errors::Result<()> {
//! use ctxexec::exec::{Cmd, Pipe, pre};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! Cmd::new("ls -la").exec(&cancel, [pre(Pipe)]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Command lines are split into arguments, never handed to a shell, so
//! `"ps -ef | grep go"` runs `ps` with `|`, `grep` and `go` as literal
//! arguments.

pub mod cli;
pub mod doubles;
pub mod errors;
pub mod exec;
pub mod facade;
pub mod logging;
pub mod tokenize;

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};
use crate::errors::ExecError;
use crate::exec::{Cmd, ExecOption, Pipe, pre};
use crate::facade::{Prober, Runner, Std};

/// High-level entry point used by `main.rs`.
///
/// Wires Ctrl-C and the optional `--timeout` to a cancellation token, runs the
/// selected subcommand, and returns the exit code the binary should use.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cancel = CancellationToken::new();

    // Ctrl-C → cancel the running command.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("Ctrl+C received; cancelling");
            cancel.cancel();
        });
    }

    let timer = args.timeout.map(|secs| {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            info!(secs, "timeout reached; cancelling");
            cancel.cancel();
        })
    });

    let result = match args.command {
        Command::Run { log_file, command } => Std.run(&cancel, &command, &log_file).await,
        Command::Probe { command } => {
            let output = Std.probe(&cancel, &command).await;
            std::io::stdout().write_all(&output.stdout)?;
            std::io::stderr().write_all(&output.stderr)?;
            output.result
        }
        Command::Exec {
            group,
            graceful,
            command,
        } => {
            let options = exec_options(group, graceful)?;
            Cmd::new(command).exec(&cancel, options).await
        }
    };

    if let Some(timer) = timer {
        timer.abort();
    }

    exit_code(result)
}

#[cfg(unix)]
fn exec_options(group: bool, graceful: bool) -> Result<Vec<ExecOption>> {
    use crate::exec::{Chain, KillGroup, Setpgid, Signal, SignalGroup, done};
    use nix::sys::signal::Signal::SIGTERM;

    let options = match (group, graceful) {
        (false, false) => vec![pre(Pipe)],
        (false, true) => vec![pre(Pipe), done(Signal(SIGTERM))],
        (true, false) => vec![pre(Chain::new().then(Pipe).then(Setpgid)), done(KillGroup)],
        (true, true) => vec![
            pre(Chain::new().then(Pipe).then(Setpgid)),
            done(SignalGroup(SIGTERM)),
        ],
    };
    Ok(options)
}

#[cfg(not(unix))]
fn exec_options(group: bool, graceful: bool) -> Result<Vec<ExecOption>> {
    if group || graceful {
        anyhow::bail!("--group and --graceful are only supported on unix");
    }
    Ok(vec![pre(Pipe)])
}

/// Map a launch result to the binary's exit code.
///
/// A child that exited with a code passes it through; anything else that
/// reached the child is 1. Failures before launch are returned as errors.
fn exit_code(result: crate::errors::Result<()>) -> Result<i32> {
    match result {
        Ok(()) => Ok(0),
        Err(ExecError::Exit(status)) => {
            info!(%status, "command failed");
            Ok(status.code().unwrap_or(1))
        }
        Err(err) => Err(err.into()),
    }
}

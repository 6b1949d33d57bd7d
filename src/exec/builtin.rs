// src/exec/builtin.rs

//! Ready-made hooks.
//!
//! - [`Kill`] is the default exit hook: immediate, forceful termination.
//! - [`Pipe`] (pre) forwards the child's output to the parent's stdout/stderr.
//! - On unix, [`Setpgid`] (pre) and [`KillGroup`] (exit) are used as a pair so
//!   cancellation also reaches processes spawned by the child. [`Signal`] and
//!   [`SignalGroup`] are exit hooks for a graceful shutdown the child can
//!   handle itself.

use anyhow::{Context, Result};

use super::hook::Hook;
use super::process::{Output, Process};

#[derive(Debug, Clone, Copy, Default)]
pub struct Kill;

impl Hook for Kill {
    fn call(&self, process: &mut Process) -> Result<()> {
        process
            .start_kill()
            .with_context(|| format!("killing {}", process.program().display()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipe;

impl Hook for Pipe {
    fn call(&self, process: &mut Process) -> Result<()> {
        process.set_stdout(Output::Inherit);
        process.set_stderr(Output::Inherit);
        Ok(())
    }
}

/// Make the child the leader of a new process group.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Setpgid;

#[cfg(unix)]
impl Hook for Setpgid {
    fn call(&self, process: &mut Process) -> Result<()> {
        process.command_mut().process_group(0);
        Ok(())
    }
}

/// SIGKILL the whole process group led by the child. Requires [`Setpgid`].
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct KillGroup;

#[cfg(unix)]
impl Hook for KillGroup {
    fn call(&self, process: &mut Process) -> Result<()> {
        SignalGroup(nix::sys::signal::Signal::SIGKILL).call(process)
    }
}

/// Deliver a signal to the child, e.g. `Signal(SIGTERM)`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
pub struct Signal(pub nix::sys::signal::Signal);

#[cfg(unix)]
impl Hook for Signal {
    fn call(&self, process: &mut Process) -> Result<()> {
        process
            .signal(self.0)
            .with_context(|| format!("sending {} to {}", self.0, process.program().display()))
    }
}

/// Deliver a signal to the process group led by the child. Requires [`Setpgid`].
#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
pub struct SignalGroup(pub nix::sys::signal::Signal);

#[cfg(unix)]
impl Hook for SignalGroup {
    fn call(&self, process: &mut Process) -> Result<()> {
        process.signal_group(self.0).with_context(|| {
            format!(
                "sending {} to the process group of {}",
                self.0,
                process.program().display()
            )
        })
    }
}

// src/exec/process.rs

//! The process handle that hooks operate on.
//!
//! A [`Process`] starts out as a configurable `tokio::process::Command` plus
//! stdout/stderr destinations. Once the launcher spawns it, the same handle
//! carries the running child so `post` and `exit` hooks can inspect or signal
//! it. One handle belongs to exactly one launch.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Where a stream of the child ends up.
#[derive(Default)]
pub enum Output {
    /// Discard the stream.
    #[default]
    Null,
    /// Share the parent's stream.
    Inherit,
    /// Write straight into an open file.
    File(std::fs::File),
    /// Accumulate everything in memory.
    Buffer(CaptureBuffer),
    /// Copy into an arbitrary async writer.
    Writer(Box<dyn AsyncWrite + Send + Unpin>),
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Null => f.write_str("Null"),
            Output::Inherit => f.write_str("Inherit"),
            Output::File(file) => f.debug_tuple("File").field(file).finish(),
            Output::Buffer(buf) => f.debug_tuple("Buffer").field(buf).finish(),
            Output::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Destinations that need a pipe and a drain task.
enum Sink {
    Buffer(CaptureBuffer),
    Writer(Box<dyn AsyncWrite + Send + Unpin>),
}

impl Output {
    fn into_stdio(self) -> (Stdio, Option<Sink>) {
        match self {
            Output::Null => (Stdio::null(), None),
            Output::Inherit => (Stdio::inherit(), None),
            Output::File(file) => (Stdio::from(file), None),
            Output::Buffer(buf) => (Stdio::piped(), Some(Sink::Buffer(buf))),
            Output::Writer(w) => (Stdio::piped(), Some(Sink::Writer(w))),
        }
    }
}

/// Growable in-memory byte buffer shared between a drain task and its owner.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything captured so far.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Move the captured bytes out, leaving the buffer empty.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn extend(&self, bytes: &[u8]) {
        self.lock().extend_from_slice(bytes);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        // A panicking writer cannot leave the Vec half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One OS process, before and during its lifetime.
#[derive(Debug)]
pub struct Process {
    program: PathBuf,
    args: Vec<String>,
    command: Command,
    stdout: Output,
    stderr: Output,
    child: Option<Child>,
    drains: Vec<JoinHandle<io::Result<()>>>,
}

impl Process {
    pub(crate) fn new(program: PathBuf, args: &[String]) -> Self {
        let mut command = Command::new(&program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);

        Self {
            program,
            args: args.to_vec(),
            command,
            stdout: Output::Null,
            stderr: Output::Null,
            child: None,
            drains: Vec::new(),
        }
    }

    /// Resolved path of the executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The underlying command, for settings such as the working directory,
    /// environment, stdin or process group.
    ///
    /// Only meaningful before start. Stdout and stderr set here are
    /// overridden by [`set_stdout`](Self::set_stdout) and
    /// [`set_stderr`](Self::set_stderr).
    pub fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    pub fn set_stdout(&mut self, output: Output) {
        self.stdout = output;
    }

    pub fn set_stderr(&mut self, output: Output) {
        self.stderr = output;
    }

    pub fn is_started(&self) -> bool {
        self.child.is_some()
    }

    /// OS identifier of the running child.
    ///
    /// `None` before start and once the child has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Begin forceful termination (SIGKILL on unix) without waiting for it.
    pub fn start_kill(&mut self) -> io::Result<()> {
        match self.child.as_mut() {
            Some(child) => child.start_kill(),
            None => Err(not_started()),
        }
    }

    /// Send `signal` to the child.
    #[cfg(unix)]
    pub fn signal(&self, signal: nix::sys::signal::Signal) -> io::Result<()> {
        let pid = self.pid()?;
        nix::sys::signal::kill(pid, signal).map_err(io::Error::from)
    }

    /// Send `signal` to the process group led by the child.
    ///
    /// The child must have been made a group leader before start, e.g. with
    /// [`Setpgid`](crate::exec::Setpgid).
    #[cfg(unix)]
    pub fn signal_group(&self, signal: nix::sys::signal::Signal) -> io::Result<()> {
        let pid = self.pid()?;
        nix::sys::signal::killpg(pid, signal).map_err(io::Error::from)
    }

    #[cfg(unix)]
    fn pid(&self) -> io::Result<nix::unistd::Pid> {
        let id = self.id().ok_or_else(not_running)?;
        let raw = i32::try_from(id).map_err(|_| io::Error::other(format!("pid {id} out of range")))?;
        Ok(nix::unistd::Pid::from_raw(raw))
    }

    /// Spawn the child with the configured destinations.
    pub(crate) fn start(&mut self) -> io::Result<()> {
        let (stdout, stdout_sink) = std::mem::take(&mut self.stdout).into_stdio();
        let (stderr, stderr_sink) = std::mem::take(&mut self.stderr).into_stdio();
        self.command.stdout(stdout).stderr(stderr);

        let mut child = self.command.spawn()?;

        if let (Some(sink), Some(pipe)) = (stdout_sink, child.stdout.take()) {
            self.drains.push(tokio::spawn(drain(pipe, sink)));
        }
        if let (Some(sink), Some(pipe)) = (stderr_sink, child.stderr.take()) {
            self.drains.push(tokio::spawn(drain(pipe, sink)));
        }

        self.child = Some(child);
        Ok(())
    }

    /// Whether the child has been started and has already exited.
    pub(crate) fn has_exited(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(Some(_))))
    }

    /// Wait for the child to exit and for every drain to finish.
    ///
    /// Cancel safe: dropping the future part way leaves the remaining drains
    /// in place for the next call.
    pub(crate) async fn wait(&mut self) -> io::Result<ExitStatus> {
        let child = self.child.as_mut().ok_or_else(not_started)?;
        let status = child.wait().await?;
        self.join_drains().await;
        Ok(status)
    }

    /// Like [`wait`](Self::wait), but give up on output still open `grace`
    /// after the child exited.
    ///
    /// A background grandchild can inherit the capture pipes and keep them
    /// open long after the child is gone. Its remaining output is dropped.
    pub(crate) async fn wait_within(&mut self, grace: Duration) -> io::Result<ExitStatus> {
        let child = self.child.as_mut().ok_or_else(not_started)?;
        let status = child.wait().await?;

        if tokio::time::timeout(grace, self.join_drains()).await.is_err() {
            warn!(
                program = %self.program.display(),
                open = self.drains.len(),
                "output still open after the process exited; abandoning it"
            );
            for handle in self.drains.drain(..) {
                handle.abort();
                let _ = handle.await;
            }
        }

        Ok(status)
    }

    async fn join_drains(&mut self) {
        while let Some(handle) = self.drains.last_mut() {
            let joined = handle.await;
            self.drains.pop();
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(program = %self.program.display(), error = %e, "output drain failed"),
                Err(e) => warn!(program = %self.program.display(), error = %e, "output drain task aborted"),
            }
        }
    }
}

async fn drain<R>(mut pipe: R, sink: Sink) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    match sink {
        Sink::Buffer(buf) => {
            let mut chunk = [0u8; 8192];
            loop {
                let n = pipe.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                buf.extend(&chunk[..n]);
            }
        }
        Sink::Writer(mut writer) => {
            let copied = tokio::io::copy(&mut pipe, &mut writer).await?;
            writer.flush().await?;
            debug!(bytes = copied, "output drained to writer");
        }
    }
    Ok(())
}

fn not_started() -> io::Error {
    io::Error::other("process has not been started")
}

#[cfg(unix)]
fn not_running() -> io::Error {
    io::Error::other("process is not running")
}

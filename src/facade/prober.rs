// src/facade/prober.rs

//! Run a command and hand back everything it printed.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::exec::{CaptureBuffer, Cmd, Output, Process, pre};

use super::Std;

/// Captured output of a probe, along with how the launch ended.
///
/// `stdout` and `stderr` hold whatever the process wrote even when `result`
/// is an error, so diagnostics can be shown without running it again.
#[derive(Debug, Clone)]
pub struct ProbeOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub result: Result<()>,
}

impl ProbeOutput {
    /// Drop the captured output on failure.
    pub fn into_result(self) -> Result<(Vec<u8>, Vec<u8>)> {
        self.result.map(|()| (self.stdout, self.stderr))
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs a command and returns its output for inspection.
pub trait Prober: Send + Sync {
    /// Start `cmd` and wait for it to exit, capturing stdout and stderr
    /// separately. Cancelling `cancel` terminates the process while it runs.
    fn probe<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = ProbeOutput> + Send + 'a>>;
}

impl Prober for Std {
    fn probe<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = ProbeOutput> + Send + 'a>> {
        Box::pin(async move {
            let stdout = CaptureBuffer::new();
            let stderr = CaptureBuffer::new();

            let wire = {
                let (stdout, stderr) = (stdout.clone(), stderr.clone());
                move |p: &mut Process| -> anyhow::Result<()> {
                    p.set_stdout(Output::Buffer(stdout.clone()));
                    p.set_stderr(Output::Buffer(stderr.clone()));
                    Ok(())
                }
            };

            let result = Cmd::new(cmd).exec(cancel, [pre(wire)]).await;

            ProbeOutput {
                stdout: stdout.take(),
                stderr: stderr.take(),
                result,
            }
        })
    }
}

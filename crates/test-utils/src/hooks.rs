#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use anyhow::{Result, bail};
use ctxexec::exec::{Hook, Process};

/// A hook that counts its invocations and optionally fails.
#[derive(Debug, Clone, Default)]
pub struct CountingHook {
    calls: Arc<AtomicUsize>,
    fail_with: Option<&'static str>,
}

impl CountingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A counting hook that returns an error carrying `message`.
    pub fn failing(message: &'static str) -> Self {
        Self {
            calls: Arc::default(),
            fail_with: Some(message),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Hook for CountingHook {
    fn call(&self, _process: &mut Process) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(message) => bail!(message),
            None => Ok(()),
        }
    }
}

/// A `post` hook that remembers the pid of the started child.
#[derive(Debug, Clone, Default)]
pub struct RecordPid {
    pid: Arc<AtomicU32>,
}

impl RecordPid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pid(&self) -> Option<u32> {
        match self.pid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }
}

impl Hook for RecordPid {
    fn call(&self, process: &mut Process) -> Result<()> {
        if let Some(pid) = process.id() {
            self.pid.store(pid, Ordering::SeqCst);
        }
        Ok(())
    }
}

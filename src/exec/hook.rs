// src/exec/hook.rs

//! Hooks: side effects applied to a [`Process`] at a lifecycle stage.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use super::process::Process;

/// A function over the process handle, invoked at one lifecycle stage.
///
/// Hooks must not keep the handle beyond the call. Any closure
/// `Fn(&mut Process) -> anyhow::Result<()>` is a hook.
pub trait Hook: Send + Sync {
    fn call(&self, process: &mut Process) -> Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&mut Process) -> Result<()> + Send + Sync,
{
    fn call(&self, process: &mut Process) -> Result<()> {
        self(process)
    }
}

/// Shared, type-erased hook.
pub type HookRef = Arc<dyn Hook>;

/// Erase a hook into a [`HookRef`].
pub fn hook<H: Hook + 'static>(h: H) -> HookRef {
    Arc::new(h)
}

/// Runs hooks in order against the same process, stopping at the first error.
///
/// An empty chain does nothing and succeeds.
#[derive(Clone, Default)]
pub struct Chain {
    hooks: Vec<HookRef>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to the end of the chain.
    pub fn then<H: Hook + 'static>(mut self, h: H) -> Self {
        self.hooks.push(Arc::new(h));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").field("len", &self.hooks.len()).finish()
    }
}

impl FromIterator<HookRef> for Chain {
    fn from_iter<I: IntoIterator<Item = HookRef>>(iter: I) -> Self {
        Self {
            hooks: iter.into_iter().collect(),
        }
    }
}

impl Hook for Chain {
    fn call(&self, process: &mut Process) -> Result<()> {
        for h in &self.hooks {
            h.call(process)?;
        }
        Ok(())
    }
}

/// Compose `hooks` into a single fail-fast hook.
pub fn chain<I>(hooks: I) -> Chain
where
    I: IntoIterator<Item = HookRef>,
{
    hooks.into_iter().collect()
}

/// Does nothing. Useful as a `done` hook that lets the child run to completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Hook for Noop {
    fn call(&self, _process: &mut Process) -> Result<()> {
        Ok(())
    }
}

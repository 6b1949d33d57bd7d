// src/exec/options.rs

//! Launch options: which hook runs at which stage.
//!
//! Options are applied in order to [`Hooks::default`], which only installs
//! [`Kill`] as the exit hook. A later option for a stage replaces an earlier
//! one; use [`Chain`](super::Chain) to run several hooks at one stage.

use std::fmt;
use std::sync::Arc;

use super::builtin::Kill;
use super::hook::{Hook, HookRef};

/// Lifecycle stage a hook is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Before start. An error aborts the launch.
    Pre,
    /// Right after start. Errors are logged and ignored.
    Post,
    /// When the token is cancelled before the process exits on its own.
    Exit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pre => "pre",
            Stage::Post => "post",
            Stage::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// Installs a hook for one stage.
#[derive(Clone)]
pub struct ExecOption {
    stage: Stage,
    hook: HookRef,
}

impl ExecOption {
    pub fn new(stage: Stage, hook: HookRef) -> Self {
        Self { stage, hook }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl fmt::Debug for ExecOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecOption").field("stage", &self.stage).finish()
    }
}

/// Run `h` before the process starts; an error prevents the start.
pub fn pre<H: Hook + 'static>(h: H) -> ExecOption {
    ExecOption::new(Stage::Pre, Arc::new(h))
}

/// Run `h` after the process starts; its error is ignored.
pub fn post<H: Hook + 'static>(h: H) -> ExecOption {
    ExecOption::new(Stage::Post, Arc::new(h))
}

/// Replace the default [`Kill`] exit hook, typically with a signal the child
/// handles as a graceful shutdown.
pub fn done<H: Hook + 'static>(h: H) -> ExecOption {
    ExecOption::new(Stage::Exit, Arc::new(h))
}

/// Effective hook per stage for one launch.
#[derive(Clone)]
pub struct Hooks {
    pub pre: Option<HookRef>,
    pub post: Option<HookRef>,
    pub exit: Option<HookRef>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            pre: None,
            post: None,
            exit: Some(Arc::new(Kill)),
        }
    }
}

impl Hooks {
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ExecOption>,
    {
        let mut hooks = Self::default();
        for option in options {
            hooks.apply(option);
        }
        hooks
    }

    pub fn apply(&mut self, option: ExecOption) {
        let slot = match option.stage {
            Stage::Pre => &mut self.pre,
            Stage::Post => &mut self.post,
            Stage::Exit => &mut self.exit,
        };
        *slot = Some(option.hook);
    }

    pub fn get(&self, stage: Stage) -> Option<&HookRef> {
        match stage {
            Stage::Pre => self.pre.as_ref(),
            Stage::Post => self.post.as_ref(),
            Stage::Exit => self.exit.as_ref(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}

// src/exec/mod.rs

//! Process execution layer.
//!
//! This module launches one external process per call using
//! `tokio::process::Command`, and ties its lifetime to a
//! `CancellationToken`.
//!
//! - [`launcher`] owns [`Cmd`] and the start/wait/cancel protocol.
//! - [`process`] is the handle hooks operate on, plus output destinations.
//! - [`hook`] defines the [`Hook`] trait and the fail-fast [`Chain`].
//! - [`options`] maps lifecycle stages to hooks (`pre`, `post`, `done`).
//! - [`builtin`] has the stock hooks: the default [`Kill`], [`Pipe`], and the
//!   unix process-group and signal hooks.

pub mod builtin;
pub mod hook;
pub mod launcher;
pub mod options;
pub mod process;

pub use builtin::{Kill, Pipe};
#[cfg(unix)]
pub use builtin::{KillGroup, Setpgid, Signal, SignalGroup};
pub use hook::{Chain, Hook, HookRef, Noop, chain, hook};
pub use launcher::{Cmd, exec};
pub use options::{ExecOption, Hooks, Stage, done, post, pre};
pub use process::{CaptureBuffer, Output, Process};

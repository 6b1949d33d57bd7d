// src/facade/mod.rs

//! Convenience operations built from the launcher.
//!
//! Callers depend on the [`Runner`] and [`Prober`] traits so their own tests
//! can substitute the doubles in [`crate::doubles`]. Production code uses
//! [`Std`], a stateless value that is cheap to copy and safe to share.
//!
//! - [`runner`] writes merged stdout/stderr to a log file.
//! - [`prober`] captures stdout and stderr in memory.

pub mod prober;
pub mod runner;

pub use prober::{ProbeOutput, Prober};
pub use runner::Runner;

/// Real implementation of [`Runner`] and [`Prober`].
///
/// Each call builds its own process handle and buffers, so one `Std` can
/// serve any number of concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Std;

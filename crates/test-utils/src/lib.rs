//! Shared helpers for `ctxexec` integration tests.

pub mod hooks;
pub mod scripts;

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `ctxexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ctxexec",
    version,
    about = "Run a command without a shell, killing it on Ctrl-C or timeout.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CTXEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Cancel the command after this many seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write merged stdout/stderr of COMMAND to a log file.
    Run {
        /// File to create or truncate.
        #[arg(long, value_name = "PATH")]
        log_file: PathBuf,

        /// Command line, e.g. "ls -la".
        command: String,
    },

    /// Capture stdout/stderr of COMMAND and print them once it exits.
    Probe {
        command: String,
    },

    /// Run COMMAND with its output on this terminal.
    Exec {
        /// Start COMMAND in its own process group and kill the whole group
        /// on cancellation.
        #[arg(long)]
        group: bool,

        /// Send SIGTERM instead of SIGKILL on cancellation.
        #[arg(long)]
        graceful: bool,

        command: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

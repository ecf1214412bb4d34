//! External command execution
//!
//! Everything this crate does outside its own process goes through one of two
//! capabilities: [`CommandRunner`] for blocking command invocations and
//! [`ResourceOpener`] for best-effort "open this URL" requests. Both are
//! injectable so the provisioning sequence can be exercised without a
//! container runtime installed.

pub mod mock;
mod system;

pub use mock::{RecordingOpener, ScriptedRunner};
pub use system::{SystemCommandRunner, SystemResourceOpener};

use serde::Serialize;
use std::fmt;
use std::io;

/// Exit code reported when a process could not be launched or was killed by a signal
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

/// Captured result of one external command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub succeeded: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub invoked_command: String,
}

impl ProcessResult {
    pub fn success(invoked_command: impl Into<String>, stdout: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            invoked_command: invoked_command.into(),
        }
    }

    pub fn failure(
        invoked_command: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            succeeded: false,
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            invoked_command: invoked_command.into(),
        }
    }

    /// Result for a program that could not be started at all
    pub fn launch_failed(invoked_command: impl Into<String>, error: &io::Error) -> Self {
        Self::failure(
            invoked_command,
            LAUNCH_FAILURE_EXIT_CODE,
            String::new(),
            format!("failed to launch: {}", error),
        )
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "command: {}", self.invoked_command)?;
        writeln!(f, "exit code: {}", self.exit_code)?;
        writeln!(f, "stdout:\n{}", self.stdout)?;
        write!(f, "stderr:\n{}", self.stderr)
    }
}

/// Runs an external command to completion and captures its output
///
/// Implementations must never panic on a missing binary; launch failure is
/// reported as an unsuccessful [`ProcessResult`] like any non-zero exit.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> ProcessResult;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[String]) -> ProcessResult {
        (**self).run(program, args)
    }
}

/// Opens a resource (typically a URL) for the operator
pub trait ResourceOpener {
    fn open(&self, target: &str) -> io::Result<()>;
}

impl<T: ResourceOpener + ?Sized> ResourceOpener for &T {
    fn open(&self, target: &str) -> io::Result<()> {
        (**self).open(target)
    }
}

/// Renders a command line the way an operator would type it
pub fn format_command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(quote_arg)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

//! Scripted stand-ins for [`CommandRunner`] and [`ResourceOpener`]

use super::{format_command_line, CommandRunner, ProcessResult, ResourceOpener};
use std::io;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    LaunchFailure,
}

/// Answers commands from a table of command-line prefixes
///
/// The first rule whose prefix matches the rendered command line wins.
/// Commands without a matching rule behave like a binary missing from `PATH`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.exit(prefix, 0, stdout, "")
    }

    pub fn exit(
        mut self,
        prefix: impl Into<String>,
        code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        self.rules.push((
            prefix.into(),
            Reply::Exit {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            },
        ));
        self
    }

    pub fn missing(mut self, prefix: impl Into<String>) -> Self {
        self.rules.push((prefix.into(), Reply::LaunchFailure));
        self
    }

    /// A runtime that is installed and whose daemon answers `info`
    pub fn healthy_runtime(runtime: &str) -> Self {
        Self::new()
            .succeed(format!("{} --version", runtime), "Docker version 27.0.3")
            .succeed(format!("{} info", runtime), "Server Version: 27.0.3")
    }

    /// Every command line seen so far, in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> ProcessResult {
        let line = format_command_line(program, args);
        self.calls.lock().unwrap().push(line.clone());

        let reply = self
            .rules
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::LaunchFailure);

        match reply {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => ProcessResult {
                succeeded: code == 0,
                exit_code: code,
                stdout,
                stderr,
                invoked_command: line,
            },
            Reply::LaunchFailure => {
                let err = io::Error::new(io::ErrorKind::NotFound, "program not found");
                ProcessResult::launch_failed(line, &err)
            }
        }
    }
}

/// Records every open request and optionally fails them
#[derive(Debug, Default)]
pub struct RecordingOpener {
    fail: bool,
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl ResourceOpener for RecordingOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        self.opened.lock().unwrap().push(target.to_string());
        if self.fail {
            Err(io::Error::new(io::ErrorKind::Other, "no browser available"))
        } else {
            Ok(())
        }
    }
}

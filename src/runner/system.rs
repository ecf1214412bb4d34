use super::{format_command_line, CommandRunner, ProcessResult, ResourceOpener, LAUNCH_FAILURE_EXIT_CODE};
use std::io;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Runs commands on the host with `std::process::Command`
///
/// `Command::output` reads stdout and stderr concurrently, so chatty
/// commands cannot fill a pipe and stall before exiting. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> ProcessResult {
        let invoked_command = format_command_line(program, args);
        trace!(command = %invoked_command, "Spawning process");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(LAUNCH_FAILURE_EXIT_CODE);
                debug!(command = %invoked_command, exit_code, "Process finished");
                ProcessResult {
                    succeeded: output.status.success(),
                    exit_code,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    invoked_command,
                }
            }
            Err(e) => {
                debug!(command = %invoked_command, error = %e, "Process failed to launch");
                ProcessResult::launch_failed(invoked_command, &e)
            }
        }
    }
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResourceOpener;

impl SystemResourceOpener {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceOpener for SystemResourceOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            Command::new("explorer")
        } else {
            Command::new("xdg-open")
        };

        command
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

use crate::error::ProvisionError;
use crate::runner::{CommandRunner, ProcessResult};
use std::path::Path;
use tracing::{info, warn};

/// Which compose command form brought the service up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeForm {
    /// `<runtime> compose ...`
    Plugin,
    /// `<runtime>-compose ...`
    Standalone,
}

/// Runs `compose up -d` for the descriptor, falling back to the standalone
/// binary when the plugin form exits non-zero.
///
/// Neither attempt has a timeout.
pub fn compose_up(
    runtime: &str,
    project: &str,
    descriptor: &Path,
    runner: &dyn CommandRunner,
) -> Result<ComposeForm, ProvisionError> {
    let up_args = up_args(project, descriptor);

    let mut plugin_args = vec!["compose".to_string()];
    plugin_args.extend(up_args.iter().cloned());

    let modern = runner.run(runtime, &plugin_args);
    if modern.succeeded {
        log_started(&modern, ComposeForm::Plugin);
        return Ok(ComposeForm::Plugin);
    }
    warn!(
        command = %modern.invoked_command,
        exit_code = modern.exit_code,
        "Compose plugin failed, trying standalone compose"
    );

    let legacy = runner.run(&format!("{}-compose", runtime), &up_args);
    if legacy.succeeded {
        log_started(&legacy, ComposeForm::Standalone);
        return Ok(ComposeForm::Standalone);
    }

    Err(ProvisionError::OrchestrationFailed { modern, legacy })
}

fn up_args(project: &str, descriptor: &Path) -> Vec<String> {
    vec![
        "-p".to_string(),
        project.to_string(),
        "-f".to_string(),
        descriptor.display().to_string(),
        "up".to_string(),
        "-d".to_string(),
    ]
}

fn log_started(result: &ProcessResult, form: ComposeForm) {
    info!(command = %result.invoked_command, form = ?form, "SQL Server container started");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;
    use std::path::PathBuf;

    fn descriptor() -> PathBuf {
        PathBuf::from("/work/site/.docker/docker-compose.yml")
    }

    #[test]
    fn test_plugin_form_succeeds() {
        let runner = ScriptedRunner::new().succeed("docker compose", "");

        let form = compose_up("docker", "site", &descriptor(), &runner).unwrap();

        assert_eq!(form, ComposeForm::Plugin);
        assert_eq!(
            runner.calls(),
            vec!["docker compose -p site -f /work/site/.docker/docker-compose.yml up -d"]
        );
    }

    #[test]
    fn test_falls_back_to_standalone() {
        let runner = ScriptedRunner::new()
            .exit("docker compose", 125, "", "'compose' is not a docker command")
            .succeed("docker-compose", "");

        let form = compose_up("docker", "site", &descriptor(), &runner).unwrap();

        assert_eq!(form, ComposeForm::Standalone);
        assert_eq!(
            runner.calls(),
            vec![
                "docker compose -p site -f /work/site/.docker/docker-compose.yml up -d",
                "docker-compose -p site -f /work/site/.docker/docker-compose.yml up -d",
            ]
        );
    }

    #[test]
    fn test_both_forms_fail() {
        let runner = ScriptedRunner::new()
            .exit("docker compose", 125, "plugin out", "plugin err")
            .exit("docker-compose", 2, "legacy out", "legacy err");

        let err = compose_up("docker", "site", &descriptor(), &runner).unwrap_err();

        match &err {
            ProvisionError::OrchestrationFailed { modern, legacy } => {
                assert_eq!(modern.exit_code, 125);
                assert_eq!(legacy.exit_code, 2);
            }
            other => panic!("Expected OrchestrationFailed, got {:?}", other),
        }
        let message = err.to_string();
        for expected in ["125", "plugin out", "plugin err", "legacy out", "legacy err"] {
            assert!(message.contains(expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn test_missing_standalone_binary_is_a_failure() {
        let runner = ScriptedRunner::new().exit("docker compose", 1, "", "boom");

        let err = compose_up("docker", "site", &descriptor(), &runner).unwrap_err();
        match err {
            ProvisionError::OrchestrationFailed { legacy, .. } => {
                assert_eq!(legacy.exit_code, crate::runner::LAUNCH_FAILURE_EXIT_CODE);
            }
            other => panic!("Expected OrchestrationFailed, got {:?}", other),
        }
    }
}

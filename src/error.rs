use crate::compose::ComposeError;
use crate::config::ConfigError;
use crate::provisioner::ProvisionStage;
use crate::runner::ProcessResult;
use thiserror::Error;

/// Where to send operators who do not have the container runtime yet
pub const INSTALL_GUIDE_URL: &str = "https://docs.docker.com/get-docker/";

/// Failures that abort provisioning
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error(
        "{runtime} is required for local SQL provisioning but could not be run (`{}` exited with {}). Install it from {url}",
        .probe.invoked_command,
        .probe.exit_code,
        url = INSTALL_GUIDE_URL
    )]
    RuntimeNotInstalled { runtime: String, probe: ProcessResult },

    #[error(
        "{runtime} is installed but its daemon is not running (`{}` exited with {}). Start {runtime} and try again.\n{}",
        .probe.invoked_command,
        .probe.exit_code,
        .probe.stderr.trim_end()
    )]
    RuntimeNotRunning { runtime: String, probe: ProcessResult },

    #[error(transparent)]
    Descriptor(#[from] ComposeError),

    #[error("{}", orchestration_report(.modern, .legacy))]
    OrchestrationFailed {
        modern: ProcessResult,
        legacy: ProcessResult,
    },
}

impl ProvisionError {
    /// Stage of the provisioning sequence this failure ended
    pub fn stage(&self) -> ProvisionStage {
        match self {
            ProvisionError::Configuration(_) => ProvisionStage::Validating,
            ProvisionError::RuntimeNotInstalled { .. } | ProvisionError::RuntimeNotRunning { .. } => {
                ProvisionStage::RuntimeChecking
            }
            ProvisionError::Descriptor(_) => ProvisionStage::DescriptorWriting,
            ProvisionError::OrchestrationFailed { .. } => ProvisionStage::OrchestrationStarting,
        }
    }

    pub fn is_runtime_unavailable(&self) -> bool {
        matches!(
            self,
            ProvisionError::RuntimeNotInstalled { .. } | ProvisionError::RuntimeNotRunning { .. }
        )
    }
}

fn orchestration_report(modern: &ProcessResult, legacy: &ProcessResult) -> String {
    format!(
        "Failed to start the SQL Server container with either compose command.\n\n\
         --- attempt 1 ---\n{}\n\n\
         --- attempt 2 ---\n{}",
        modern, legacy
    )
}

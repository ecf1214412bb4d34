//! Environment-driven provisioning of a local SQL Server container
//!
//! One call walks a fixed sequence of stages:
//!
//! ```text
//! Validating -> RuntimeChecking -> DescriptorWriting -> OrchestrationStarting -> ConfiguringSink
//! ```
//!
//! A disabled configuration stops before the first stage without touching
//! anything. Any stage failing ends the attempt with a [`ProvisionError`];
//! the sink is only written once the container has been brought up.

use crate::compose::ComposeDescriptor;
use crate::config::{ConfigSource, ProvisionRequest};
use crate::error::ProvisionError;
use crate::orchestration::{compose_up, ComposeForm};
use crate::project::{self, ProjectRoot};
use crate::runner::{CommandRunner, ResourceOpener};
use crate::runtime::check_runtime;
use crate::sink::{ConfigSink, ConnectionDescriptor};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_RUNTIME: &str = "docker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStage {
    Validating,
    RuntimeChecking,
    DescriptorWriting,
    OrchestrationStarting,
    ConfiguringSink,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisionStage::Validating => "validating",
            ProvisionStage::RuntimeChecking => "runtime-checking",
            ProvisionStage::DescriptorWriting => "descriptor-writing",
            ProvisionStage::OrchestrationStarting => "orchestration-starting",
            ProvisionStage::ConfiguringSink => "configuring-sink",
        };
        f.write_str(name)
    }
}

/// What a provisioning call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The enablement flag was not set; nothing ran
    Disabled,
    Provisioned {
        connection: ConnectionDescriptor,
        descriptor_path: PathBuf,
        project_name: String,
        compose_form: ComposeForm,
    },
}

impl ProvisionOutcome {
    pub fn is_disabled(&self) -> bool {
        matches!(self, ProvisionOutcome::Disabled)
    }
}

/// Descriptor written without starting anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDescriptor {
    pub path: PathBuf,
    pub content: String,
    pub project_name: String,
}

/// Where project-root detection starts and ends
#[derive(Debug, Clone)]
pub struct RootSearch {
    /// Directory whose ancestors are searched for a project marker
    pub start: Option<PathBuf>,
    /// Used when no marker is found
    pub working_dir: PathBuf,
}

impl RootSearch {
    /// Starts at the running binary's directory, falling back to the cwd
    pub fn from_process() -> Self {
        let start = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from));
        let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { start, working_dir }
    }
}

pub struct Provisioner<R, O> {
    runner: R,
    opener: O,
    runtime: String,
    root_search: RootSearch,
}

impl<R: CommandRunner, O: ResourceOpener> Provisioner<R, O> {
    pub fn new(runner: R, opener: O) -> Self {
        Self {
            runner,
            opener,
            runtime: DEFAULT_RUNTIME.to_string(),
            root_search: RootSearch::from_process(),
        }
    }

    /// Container runtime binary; the standalone compose binary is `<runtime>-compose`
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn with_root_search(mut self, root_search: RootSearch) -> Self {
        self.root_search = root_search;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Brings up the configured database and writes its connection settings
    pub fn provision(
        &self,
        source: &dyn ConfigSource,
        sink: &mut dyn ConfigSink,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        enter(ProvisionStage::Validating);
        let Some(request) = ProvisionRequest::from_source(source)? else {
            return Ok(ProvisionOutcome::Disabled);
        };
        info!(
            db_name = %request.database_name,
            port = request.host_port,
            "Local Docker SQL settings validated"
        );

        enter(ProvisionStage::RuntimeChecking);
        check_runtime(&self.runtime, &self.runner, &self.opener)?;

        enter(ProvisionStage::DescriptorWriting);
        let root = self.resolve_root(&request);
        let project_name = project::project_name(request.project_name.as_deref(), &root.path);
        let descriptor_path = ComposeDescriptor::for_request(&request).write(&root.path)?;

        enter(ProvisionStage::OrchestrationStarting);
        info!(
            project = %project_name,
            path = %descriptor_path.display(),
            "Starting SQL Server container"
        );
        let compose_form = compose_up(&self.runtime, &project_name, &descriptor_path, &self.runner)?;

        enter(ProvisionStage::ConfiguringSink);
        let connection = ConnectionDescriptor::for_request(&request);
        connection.apply(sink);
        info!(
            connection = %connection.redacted(),
            provider = %connection.provider_name,
            "Database connection configured"
        );

        Ok(ProvisionOutcome::Provisioned {
            connection,
            descriptor_path,
            project_name,
            compose_form,
        })
    }

    /// Validates settings and writes the descriptor without invoking anything
    ///
    /// Returns `Ok(None)` when provisioning is disabled.
    pub fn render_descriptor(
        &self,
        source: &dyn ConfigSource,
    ) -> Result<Option<RenderedDescriptor>, ProvisionError> {
        let Some(request) = ProvisionRequest::from_source(source)? else {
            return Ok(None);
        };

        let root = self.resolve_root(&request);
        let project_name = project::project_name(request.project_name.as_deref(), &root.path);
        let descriptor = ComposeDescriptor::for_request(&request);
        let content = descriptor.render()?;
        let path = descriptor.write(&root.path)?;

        Ok(Some(RenderedDescriptor {
            path,
            content,
            project_name,
        }))
    }

    /// Runs only the runtime probes
    pub fn check_runtime(&self) -> Result<(), ProvisionError> {
        check_runtime(&self.runtime, &self.runner, &self.opener)
    }

    fn resolve_root(&self, request: &ProvisionRequest) -> ProjectRoot {
        project::resolve_root(
            request.project_root_override.as_deref(),
            self.root_search.start.as_deref(),
            &self.root_search.working_dir,
        )
    }
}

fn enter(stage: ProvisionStage) {
    debug!(%stage, "Entering provisioning stage");
}

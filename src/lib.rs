//! local-docker-sql - a local SQL Server container for development hosts
//!
//! On startup a host application calls [`provision`] (or
//! [`provision_from_env`]) once. When `Use_Local_Docker_SQL` is `true` the
//! call checks that the container runtime is installed and running, writes
//! `<project root>/.docker/docker-compose.yml`, runs `docker compose up -d`
//! (falling back to `docker-compose`), and writes the resulting connection
//! string into the host's configuration.
//!
//! # Example
//!
//! ```no_run
//! use local_docker_sql::{provision_from_env, MemorySink, CONNECTION_STRING_KEY};
//!
//! let mut sink = MemorySink::new();
//! provision_from_env(&mut sink).expect("local SQL provisioning failed");
//!
//! if let Some(dsn) = sink.get(CONNECTION_STRING_KEY) {
//!     println!("using {}", dsn);
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`config`]: configuration sources and request validation
//! - [`project`]: project root detection and compose project naming
//! - [`compose`]: the generated compose descriptor
//! - [`runner`]: external command and browser capabilities
//! - [`provisioner`]: the provisioning sequence itself

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod orchestration;
pub mod project;
pub mod provisioner;
pub mod runner;
pub mod runtime;
pub mod sink;
pub mod util;

pub use config::{ConfigError, ConfigSource, EnvSource, LaunchProfileSource, LayeredSource, MapSource};
pub use error::ProvisionError;
pub use provisioner::{ProvisionOutcome, ProvisionStage, Provisioner};
pub use runner::{CommandRunner, ProcessResult, ResourceOpener, SystemCommandRunner, SystemResourceOpener};
pub use sink::{
    ConfigSink, ConnectionDescriptor, MemorySink, CONNECTION_STRING_KEY, PROVIDER_NAME_KEY,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Provisions using the host's real commands and browser
pub fn provision(
    source: &dyn ConfigSource,
    sink: &mut dyn ConfigSink,
) -> Result<ProvisionOutcome, ProvisionError> {
    Provisioner::new(SystemCommandRunner::new(), SystemResourceOpener::new()).provision(source, sink)
}

/// Provisions from process environment variables
pub fn provision_from_env(sink: &mut dyn ConfigSink) -> Result<ProvisionOutcome, ProvisionError> {
    provision(&EnvSource::new(), sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "local-docker-sql");
    }

    #[test]
    fn test_provision_disabled_source_is_silent() {
        let mut sink = MemorySink::new();
        let outcome = provision(&MapSource::new(), &mut sink).unwrap();

        assert!(outcome.is_disabled());
        assert!(sink.is_empty());
    }
}

//! Container runtime availability checks

use crate::error::{ProvisionError, INSTALL_GUIDE_URL};
use crate::runner::{CommandRunner, ResourceOpener};
use tracing::{debug, info, warn};

/// Verifies the runtime binary runs and its daemon answers
///
/// A missing binary sends the operator to the install guide (browser first,
/// printed URL if that fails) before the error is returned.
pub fn check_runtime(
    runtime: &str,
    runner: &dyn CommandRunner,
    opener: &dyn ResourceOpener,
) -> Result<(), ProvisionError> {
    let version = runner.run(runtime, &["--version".to_string()]);
    if !version.succeeded {
        warn!(
            runtime,
            exit_code = version.exit_code,
            "Container runtime is not installed"
        );
        point_to_install_guide(opener);
        return Err(ProvisionError::RuntimeNotInstalled {
            runtime: runtime.to_string(),
            probe: version,
        });
    }
    debug!(runtime, version = %version.stdout.trim(), "Container runtime found");

    let info = runner.run(runtime, &["info".to_string()]);
    if !info.succeeded {
        warn!(
            runtime,
            exit_code = info.exit_code,
            "Container runtime daemon is not running"
        );
        return Err(ProvisionError::RuntimeNotRunning {
            runtime: runtime.to_string(),
            probe: info,
        });
    }

    info!(runtime, "Container runtime is available");
    Ok(())
}

fn point_to_install_guide(opener: &dyn ResourceOpener) {
    if let Err(e) = opener.open(INSTALL_GUIDE_URL) {
        debug!(error = %e, "Could not open browser");
        eprintln!("Install Docker from {}", INSTALL_GUIDE_URL);
    }
}

//! Provisioning settings
//!
//! Settings are read through the [`ConfigSource`] capability so the same
//! validation applies whether values come from process environment
//! variables, a launch-settings JSON profile, or an in-memory map.
//!
//! # Settings
//!
//! - `Use_Local_Docker_SQL`: `true` (any case) enables provisioning; anything else disables it
//! - `Local_Docker_DB_NAME`: database name - **required when enabled**
//! - `Local_Docker_PASSWORD`: `sa` password - **required when enabled**
//! - `Local_Docker_PORT`: host port mapped to the container's 1433 - **required when enabled**
//! - `Local_Docker_PROJECT_NAME`: compose project name - default: project root directory name
//! - `Local_Docker_CONTAINER_DIRECTORY_OVERRIDE`: project root - default: detected from the binary location

pub mod launch_profile;
pub mod request;
pub mod source;

pub use launch_profile::LaunchProfileSource;
pub use request::{
    is_enabled, ConfigError, ProvisionRequest, KEY_DB_NAME, KEY_ENABLED, KEY_PASSWORD, KEY_PORT,
    KEY_PROJECT_NAME, KEY_ROOT_OVERRIDE,
};
pub use source::{ConfigSource, EnvSource, LayeredSource, MapSource};

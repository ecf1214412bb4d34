//! Launch-settings documents as a configuration source
//!
//! Development hosts often keep per-profile environment variables in a JSON
//! document of the shape:
//!
//! ```json
//! {
//!   "profiles": {
//!     "Site": {
//!       "environmentVariables": {
//!         "Use_Local_Docker_SQL": "true",
//!         "Local_Docker_DB_NAME": "MyDb"
//!       }
//!     }
//!   }
//! }
//! ```

use super::request::{ConfigError, KEY_ENABLED};
use super::source::ConfigSource;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct LaunchSettings {
    #[serde(default)]
    profiles: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Profile {
    #[serde(default, rename = "environmentVariables")]
    environment_variables: Map<String, Value>,
}

/// Environment variables of a single launch profile
#[derive(Debug, Clone)]
pub struct LaunchProfileSource {
    profile: String,
    values: HashMap<String, String>,
}

impl LaunchProfileSource {
    pub fn from_file(path: &Path, profile: Option<&str>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LaunchProfile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content, profile).map_err(|e| match e {
            ConfigError::LaunchProfile { message, .. } => ConfigError::LaunchProfile {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parses a launch-settings document and selects one profile
    ///
    /// Without an explicit name, the first profile mentioning the enablement
    /// flag is chosen, then the first profile declaring any variables.
    pub fn from_json(content: &str, profile: Option<&str>) -> Result<Self, ConfigError> {
        let settings: LaunchSettings =
            serde_json::from_str(content).map_err(|e| ConfigError::LaunchProfile {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;

        let mut profiles = Vec::with_capacity(settings.profiles.len());
        for (name, value) in settings.profiles {
            let parsed: Profile =
                serde_json::from_value(value).map_err(|e| ConfigError::LaunchProfile {
                    path: "<inline>".to_string(),
                    message: format!("profile '{}': {}", name, e),
                })?;
            profiles.push((name, parsed));
        }

        let selected = match profile {
            Some(wanted) => profiles
                .into_iter()
                .find(|(name, _)| name == wanted)
                .ok_or_else(|| ConfigError::UnknownProfile(wanted.to_string()))?,
            None => {
                let by_flag = profiles
                    .iter()
                    .position(|(_, p)| p.environment_variables.contains_key(KEY_ENABLED));
                let by_vars = profiles
                    .iter()
                    .position(|(_, p)| !p.environment_variables.is_empty());
                match by_flag.or(by_vars) {
                    Some(index) => profiles.swap_remove(index),
                    None => ("<none>".to_string(), Profile::default()),
                }
            }
        };

        let (name, profile) = selected;
        let values: HashMap<String, String> = profile
            .environment_variables
            .into_iter()
            .filter_map(|(key, value)| stringify(value).map(|v| (key, v)))
            .collect();

        debug!(profile = %name, variables = values.len(), "Loaded launch profile");

        Ok(Self {
            profile: name,
            values,
        })
    }

    pub fn profile_name(&self) -> &str {
        &self.profile
    }
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl ConfigSource for LaunchProfileSource {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

use super::source::ConfigSource;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

pub const KEY_ENABLED: &str = "Use_Local_Docker_SQL";
pub const KEY_DB_NAME: &str = "Local_Docker_DB_NAME";
pub const KEY_PASSWORD: &str = "Local_Docker_PASSWORD";
pub const KEY_PORT: &str = "Local_Docker_PORT";
pub const KEY_PROJECT_NAME: &str = "Local_Docker_PROJECT_NAME";
pub const KEY_ROOT_OVERRIDE: &str = "Local_Docker_CONTAINER_DIRECTORY_OVERRIDE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing required setting(s): {}. Set them, or set {flag} to false to disable local Docker SQL provisioning",
        .0.join(", "),
        flag = KEY_ENABLED
    )]
    MissingSettings(Vec<&'static str>),

    #[error("Invalid {key} value '{0}': expected a port number between 1 and 65535", key = KEY_PORT)]
    InvalidPort(String),

    #[error("Failed to read launch profile {path}: {message}")]
    LaunchProfile { path: String, message: String },

    #[error(
        "Invalid {key} value '{0}': only ASCII letters, digits, '_', '.' and '-' are allowed",
        key = KEY_DB_NAME
    )]
    InvalidDatabaseName(String),

    #[error("Launch profile '{0}' not found")]
    UnknownProfile(String),
}

/// Settings for one provisioning attempt
///
/// Only built for enabled configurations; a disabled source yields `None`
/// from [`ProvisionRequest::from_source`].
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub database_name: String,
    pub password: String,
    pub host_port: u16,
    pub project_name: Option<String>,
    pub project_root_override: Option<PathBuf>,
}

impl fmt::Debug for ProvisionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionRequest")
            .field("database_name", &self.database_name)
            .field("password", &"<redacted>")
            .field("host_port", &self.host_port)
            .field("project_name", &self.project_name)
            .field("project_root_override", &self.project_root_override)
            .finish()
    }
}

impl ProvisionRequest {
    /// Reads and validates the request
    ///
    /// Returns `Ok(None)` unless the enablement flag is `"true"` (any case).
    pub fn from_source(source: &dyn ConfigSource) -> Result<Option<Self>, ConfigError> {
        if !is_enabled(source) {
            debug!("Local Docker SQL disabled");
            return Ok(None);
        }

        let database_name = setting(source, KEY_DB_NAME);
        let password = setting(source, KEY_PASSWORD);
        let raw_port = setting(source, KEY_PORT);

        let missing: Vec<&'static str> = [
            (KEY_DB_NAME, database_name.is_none()),
            (KEY_PASSWORD, password.is_none()),
            (KEY_PORT, raw_port.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(database_name), Some(password), Some(raw_port)) =
            (database_name, password, raw_port)
        else {
            return Err(ConfigError::MissingSettings(missing));
        };

        if !is_valid_database_name(&database_name) {
            return Err(ConfigError::InvalidDatabaseName(database_name));
        }

        let host_port = match raw_port.trim().parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => return Err(ConfigError::InvalidPort(raw_port)),
        };

        Ok(Some(Self {
            database_name,
            password,
            host_port,
            project_name: setting(source, KEY_PROJECT_NAME),
            project_root_override: setting(source, KEY_ROOT_OVERRIDE).map(PathBuf::from),
        }))
    }
}

/// Whether the enablement flag is exactly `"true"`, ignoring case
pub fn is_enabled(source: &dyn ConfigSource) -> bool {
    source
        .get_string(KEY_ENABLED)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// The database name ends up in container and volume names: `[A-Za-z0-9_.-]+`
fn is_valid_database_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn setting(source: &dyn ConfigSource, key: &str) -> Option<String> {
    source
        .get_string(key)
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapSource;
    use yare::parameterized;

    fn complete() -> MapSource {
        MapSource::new()
            .with(KEY_ENABLED, "true")
            .with(KEY_DB_NAME, "MyDb")
            .with(KEY_PASSWORD, "Str0ngPwd!")
            .with(KEY_PORT, "1433")
    }

    #[parameterized(
        absent = { None },
        empty = { Some("") },
        false_value = { Some("false") },
        yes = { Some("yes") },
        one = { Some("1") },
        truthy_prefix = { Some("true!") },
        padded = { Some(" true") },
        trailing_newline = { Some("true\n") },
    )]
    fn test_disabled_values(flag: Option<&str>) {
        let mut source = MapSource::new()
            .with(KEY_DB_NAME, "MyDb")
            .with(KEY_PASSWORD, "pw")
            .with(KEY_PORT, "1433");
        if let Some(flag) = flag {
            source.insert(KEY_ENABLED, flag);
        }

        assert!(ProvisionRequest::from_source(&source).unwrap().is_none());
    }

    #[parameterized(
        lower = { "true" },
        upper = { "TRUE" },
        mixed = { "True" },
    )]
    fn test_enabled_values(flag: &str) {
        let source = complete().with(KEY_ENABLED, flag);
        assert!(ProvisionRequest::from_source(&source).unwrap().is_some());
    }

    #[test]
    fn test_complete_request() {
        let request = ProvisionRequest::from_source(&complete()).unwrap().unwrap();

        assert_eq!(request.database_name, "MyDb");
        assert_eq!(request.password, "Str0ngPwd!");
        assert_eq!(request.host_port, 1433);
        assert_eq!(request.project_name, None);
        assert_eq!(request.project_root_override, None);
    }

    #[test]
    fn test_optional_overrides() {
        let source = complete()
            .with(KEY_PROJECT_NAME, "My Site")
            .with(KEY_ROOT_OVERRIDE, "/srv/site");
        let request = ProvisionRequest::from_source(&source).unwrap().unwrap();

        assert_eq!(request.project_name.as_deref(), Some("My Site"));
        assert_eq!(request.project_root_override, Some(PathBuf::from("/srv/site")));
    }

    #[test]
    fn test_missing_settings_are_listed_together() {
        let source = MapSource::new()
            .with(KEY_ENABLED, "true")
            .with(KEY_PASSWORD, "pw");

        let err = ProvisionRequest::from_source(&source).unwrap_err();
        match &err {
            ConfigError::MissingSettings(keys) => {
                assert_eq!(keys, &vec![KEY_DB_NAME, KEY_PORT]);
            }
            other => panic!("Expected MissingSettings, got {:?}", other),
        }

        let message = err.to_string();
        assert!(message.contains(KEY_DB_NAME));
        assert!(message.contains(KEY_PORT));
        assert!(!message.contains(KEY_PASSWORD));
        assert!(message.contains(KEY_ENABLED));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let source = complete().with(KEY_PASSWORD, "   ");
        let err = ProvisionRequest::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSettings(ref keys) if keys == &vec![KEY_PASSWORD]));
    }

    #[parameterized(
        zero = { "0" },
        negative = { "-1" },
        too_large = { "70000" },
        text = { "sql" },
    )]
    fn test_invalid_port(port: &str) {
        let source = complete().with(KEY_PORT, port);
        let err = ProvisionRequest::from_source(&source).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref raw) if raw == port));
    }

    #[parameterized(
        space = { "My Db" },
        separator = { "a;b" },
        slash = { "db/name" },
        non_ascii = { "Daten\u{e4}" },
    )]
    fn test_invalid_database_name(name: &str) {
        let source = complete().with(KEY_DB_NAME, name);
        let err = ProvisionRequest::from_source(&source).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidDatabaseName(ref raw) if raw == name));
        assert!(err.to_string().contains(KEY_DB_NAME));
    }

    #[parameterized(
        plain = { "MyDb" },
        dotted = { "my.db" },
        dashed = { "site-db_2" },
    )]
    fn test_valid_database_name(name: &str) {
        let source = complete().with(KEY_DB_NAME, name);
        let request = ProvisionRequest::from_source(&source).unwrap().unwrap();
        assert_eq!(request.database_name, name);
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = ProvisionRequest::from_source(&complete()).unwrap().unwrap();
        let debug = format!("{:?}", request);
        assert!(!debug.contains("Str0ngPwd!"));
        assert!(debug.contains("<redacted>"));
    }
}

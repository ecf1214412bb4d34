//! Printing provisioned settings
//!
//! Sink keys use `:` as the hierarchy separator. The `env` format rewrites it
//! to `__` so the lines can be exported as environment variables, and the
//! `json` format nests the keys the way an appsettings file would.

use crate::provisioner::{ProvisionOutcome, RenderedDescriptor};
use crate::sink::MemorySink;
use anyhow::{Context, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
    Env,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the outcome of `up`; `None` means print nothing
    pub fn format_outcome(&self, outcome: &ProvisionOutcome, sink: &MemorySink) -> Result<Option<String>> {
        match (self.format, outcome) {
            (OutputFormat::Human, ProvisionOutcome::Disabled) => Ok(Some(
                "Local Docker SQL is disabled (set Use_Local_Docker_SQL=true to enable)".to_string(),
            )),
            (_, ProvisionOutcome::Disabled) => Ok(None),
            (OutputFormat::Human, ProvisionOutcome::Provisioned { .. }) => {
                Ok(Some(self.format_human(outcome)))
            }
            (OutputFormat::Json, _) => self.format_json(sink).map(Some),
            (OutputFormat::Env, _) => Ok(Some(self.format_env(sink))),
        }
    }

    fn format_human(&self, outcome: &ProvisionOutcome) -> String {
        let ProvisionOutcome::Provisioned {
            connection,
            descriptor_path,
            project_name,
            compose_form,
        } = outcome
        else {
            return String::new();
        };

        let mut output = String::new();
        output.push_str("SQL Server container is up\n");
        output.push_str(&format!("  Project:    {}\n", project_name));
        output.push_str(&format!("  Descriptor: {}\n", descriptor_path.display()));
        output.push_str(&format!("  Compose:    {:?}\n", compose_form));
        output.push_str(&format!("  Connection: {}\n", connection.redacted()));
        output.push_str(&format!("  Provider:   {}", connection.provider_name));
        output
    }

    fn format_json(&self, sink: &MemorySink) -> Result<String> {
        let mut root = Map::new();
        for (key, value) in sink.iter() {
            insert_nested(&mut root, key, value);
        }
        serde_json::to_string_pretty(&Value::Object(root)).context("Failed to serialize settings")
    }

    fn format_env(&self, sink: &MemorySink) -> String {
        sink.iter()
            .map(|(key, value)| format!("{}={}", key.replace(':', "__"), value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_rendered(&self, rendered: &RenderedDescriptor) -> String {
        format!(
            "# {} (project {})\n{}",
            rendered.path.display(),
            rendered.project_name,
            rendered.content
        )
    }
}

fn insert_nested(root: &mut Map<String, Value>, key: &str, value: &str) {
    match key.split_once(':') {
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_nested(map, rest, value);
            }
        }
        None => {
            root.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvisionRequest;
    use crate::orchestration::ComposeForm;
    use crate::sink::{ConfigSink, ConnectionDescriptor, CONNECTION_STRING_KEY, PROVIDER_NAME_KEY};
    use std::path::PathBuf;

    fn provisioned() -> (ProvisionOutcome, MemorySink) {
        let connection = ConnectionDescriptor::for_request(&ProvisionRequest {
            database_name: "MyDb".to_string(),
            password: "pw".to_string(),
            host_port: 1433,
            project_name: None,
            project_root_override: None,
        });
        let mut sink = MemorySink::new();
        connection.apply(&mut sink);
        let outcome = ProvisionOutcome::Provisioned {
            connection,
            descriptor_path: PathBuf::from("/site/.docker/docker-compose.yml"),
            project_name: "site".to_string(),
            compose_form: ComposeForm::Plugin,
        };
        (outcome, sink)
    }

    #[test]
    fn test_env_format() {
        let (outcome, sink) = provisioned();
        let output = OutputFormatter::new(OutputFormat::Env)
            .format_outcome(&outcome, &sink)
            .unwrap()
            .unwrap();

        assert!(output.contains(
            "ConnectionStrings__umbracoDbDSN=Server=127.0.0.1,1433;Database=MyDb;User Id=sa;Password=pw"
        ));
        assert!(output.contains("ConnectionStrings__umbracoDbDSN_ProviderName=Microsoft.Data.SqlClient"));
    }

    #[test]
    fn test_json_format_nests_keys() {
        let (outcome, sink) = provisioned();
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_outcome(&outcome, &sink)
            .unwrap()
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value["ConnectionStrings"]["umbracoDbDSN_ProviderName"],
            "Microsoft.Data.SqlClient"
        );
        assert!(value["ConnectionStrings"]["umbracoDbDSN"]
            .as_str()
            .unwrap()
            .contains("Database=MyDb"));
    }

    #[test]
    fn test_human_format_redacts_password() {
        let (outcome, sink) = provisioned();
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_outcome(&outcome, &sink)
            .unwrap()
            .unwrap();

        assert!(output.contains("Project:    site"));
        assert!(output.contains("Password=***"));
        assert!(!output.contains("Password=pw"));
    }

    #[test]
    fn test_disabled_prints_only_in_human_format() {
        let sink = MemorySink::new();
        let human = OutputFormatter::new(OutputFormat::Human)
            .format_outcome(&ProvisionOutcome::Disabled, &sink)
            .unwrap();
        let env = OutputFormatter::new(OutputFormat::Env)
            .format_outcome(&ProvisionOutcome::Disabled, &sink)
            .unwrap();

        assert!(human.unwrap().contains("disabled"));
        assert!(env.is_none());
    }

    #[test]
    fn test_insert_nested_handles_plain_keys() {
        let mut sink = MemorySink::new();
        sink.set("Flat", "1");
        sink.set(CONNECTION_STRING_KEY, "dsn");
        sink.set(PROVIDER_NAME_KEY, "p");

        let output = OutputFormatter::new(OutputFormat::Json).format_json(&sink).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["Flat"], "1");
        assert_eq!(value["ConnectionStrings"]["umbracoDbDSN"], "dsn");
    }
}

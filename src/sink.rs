//! Connection settings handed back to the host application

use crate::config::ProvisionRequest;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const CONNECTION_STRING_KEY: &str = "ConnectionStrings:umbracoDbDSN";
pub const PROVIDER_NAME_KEY: &str = "ConnectionStrings:umbracoDbDSN_ProviderName";
pub const SQL_SERVER_PROVIDER: &str = "Microsoft.Data.SqlClient";

const LOOPBACK: &str = "127.0.0.1";
const SA_USER: &str = "sa";

/// Destination for configuration values produced by provisioning
pub trait ConfigSink {
    fn set(&mut self, key: &str, value: &str);
}

impl<T: ConfigSink + ?Sized> ConfigSink for &mut T {
    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// Sink backed by an ordered map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorySink {
    values: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ConfigSink for MemorySink {
    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Connection string plus provider identifier for the provisioned database
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionDescriptor {
    pub connection_string: String,
    pub provider_name: String,
    #[serde(skip)]
    redacted: String,
}

impl ConnectionDescriptor {
    /// Loopback connection for a local-only container: certificate trust is
    /// relaxed and encryption is off.
    pub fn for_request(request: &ProvisionRequest) -> Self {
        let render = |password: &str| {
            format!(
                "Server={},{};Database={};User Id={};Password={};TrustServerCertificate=True;Encrypt=False",
                LOOPBACK,
                request.host_port,
                quote_value(&request.database_name),
                SA_USER,
                password
            )
        };

        Self {
            connection_string: render(&quote_value(&request.password)),
            provider_name: SQL_SERVER_PROVIDER.to_string(),
            redacted: render("***"),
        }
    }

    pub fn apply(&self, sink: &mut dyn ConfigSink) {
        sink.set(CONNECTION_STRING_KEY, &self.connection_string);
        sink.set(PROVIDER_NAME_KEY, &self.provider_name);
    }

    /// Connection string with the password masked, for logs and human output
    pub fn redacted(&self) -> &str {
        &self.redacted
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("connection_string", &self.redacted)
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

/// Quotes a connection string value when SqlClient would otherwise split it
///
/// Values containing `;`, `=`, quotes or edge whitespace are wrapped in double
/// quotes, with embedded double quotes doubled.
pub fn quote_value(value: &str) -> String {
    let needs_quotes = value.contains([';', '=', '"', '\''])
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProvisionRequest {
        request_with_password("Str0ngPwd!")
    }

    fn request_with_password(password: &str) -> ProvisionRequest {
        ProvisionRequest {
            database_name: "MyDb".to_string(),
            password: password.to_string(),
            host_port: 1433,
            project_name: None,
            project_root_override: None,
        }
    }

    #[test]
    fn test_connection_string() {
        let descriptor = ConnectionDescriptor::for_request(&request());

        assert_eq!(
            descriptor.connection_string,
            "Server=127.0.0.1,1433;Database=MyDb;User Id=sa;Password=Str0ngPwd!;TrustServerCertificate=True;Encrypt=False"
        );
        assert_eq!(descriptor.provider_name, SQL_SERVER_PROVIDER);
    }

    #[test]
    fn test_apply_writes_both_keys() {
        let mut sink = MemorySink::new();
        ConnectionDescriptor::for_request(&request()).apply(&mut sink);

        assert_eq!(sink.len(), 2);
        assert!(sink
            .get(CONNECTION_STRING_KEY)
            .unwrap()
            .starts_with("Server=127.0.0.1,1433;Database=MyDb;"));
        assert_eq!(sink.get(PROVIDER_NAME_KEY), Some(SQL_SERVER_PROVIDER));
    }

    #[test]
    fn test_redacted_hides_password() {
        let descriptor = ConnectionDescriptor::for_request(&request());
        let redacted = descriptor.redacted();

        assert!(!redacted.contains("Str0ngPwd!"));
        assert!(redacted.contains("Password=***"));
        assert!(redacted.contains("Database=MyDb"));
        assert!(!format!("{:?}", descriptor).contains("Str0ngPwd!"));
    }

    #[test]
    fn test_password_with_separator_cannot_change_database() {
        let descriptor = ConnectionDescriptor::for_request(&request_with_password("a;Database=master"));

        assert_eq!(
            descriptor.connection_string,
            "Server=127.0.0.1,1433;Database=MyDb;User Id=sa;Password=\"a;Database=master\";TrustServerCertificate=True;Encrypt=False"
        );
        assert!(!descriptor.redacted().contains("master"));
    }

    #[test]
    fn test_quote_value() {
        assert_eq!(quote_value("Str0ngPwd!"), "Str0ngPwd!");
        assert_eq!(quote_value("a=b"), "\"a=b\"");
        assert_eq!(quote_value("it's"), "\"it's\"");
        assert_eq!(quote_value("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_value(" padded"), "\" padded\"");
    }
}

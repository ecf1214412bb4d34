//! Compose descriptor for the single SQL Server service

use crate::config::ProvisionRequest;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const SQL_SERVER_IMAGE: &str = "mcr.microsoft.com/mssql/server:2022-CU14-ubuntu-22.04";
pub const SQL_SERVER_PORT: u16 = 1433;
pub const SERVICE_NAME: &str = "sqlserver";
pub const DATA_MOUNT: &str = "/var/opt/mssql";

/// Descriptor location relative to the project root
pub const DESCRIPTOR_DIR: &str = ".docker";
pub const DESCRIPTOR_FILE: &str = "docker-compose.yml";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to render compose descriptor: {0}")]
    Render(#[from] serde_yaml::Error),

    #[error("Failed to write compose descriptor {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeDescriptor {
    pub services: BTreeMap<String, ServiceSpec>,
    pub volumes: BTreeMap<String, NamedVolume>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    pub image: String,
    pub container_name: String,
    pub environment: BTreeMap<String, String>,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
    pub restart: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedVolume {}

impl ComposeDescriptor {
    pub fn for_request(request: &ProvisionRequest) -> Self {
        let volume = volume_name(&request.database_name);

        let environment = BTreeMap::from([
            ("ACCEPT_EULA".to_string(), "Y".to_string()),
            ("MSSQL_SA_PASSWORD".to_string(), request.password.clone()),
            ("MSSQL_PID".to_string(), "Developer".to_string()),
        ]);

        let service = ServiceSpec {
            image: SQL_SERVER_IMAGE.to_string(),
            container_name: container_name(&request.database_name),
            environment,
            ports: vec![format!("{}:{}", request.host_port, SQL_SERVER_PORT)],
            volumes: vec![format!("{}:{}", volume, DATA_MOUNT)],
            restart: "unless-stopped".to_string(),
        };

        Self {
            services: BTreeMap::from([(SERVICE_NAME.to_string(), service)]),
            volumes: BTreeMap::from([(volume, NamedVolume::default())]),
        }
    }

    pub fn render(&self) -> Result<String, ComposeError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the descriptor under `root`, replacing any previous one
    pub fn write(&self, root: &Path) -> Result<PathBuf, ComposeError> {
        let content = self.render()?;
        let path = descriptor_path(root);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ComposeError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, content).map_err(|source| ComposeError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Compose descriptor written");
        Ok(path)
    }
}

pub fn descriptor_path(root: &Path) -> PathBuf {
    root.join(DESCRIPTOR_DIR).join(DESCRIPTOR_FILE)
}

pub fn container_name(database_name: &str) -> String {
    format!("{}_{}", SERVICE_NAME, database_name)
}

pub fn volume_name(database_name: &str) -> String {
    format!("{}_data_{}", SERVICE_NAME, database_name)
}

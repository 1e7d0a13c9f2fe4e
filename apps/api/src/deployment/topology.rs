use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::database_url::DatabaseUrl;
use super::errors::{DeploymentError, DeploymentResult};
use super::firewall::FirewallRule;
use crate::config::{Settings, DEFAULT_DB_URL};

/// Compute host running both the API and the database container
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostSpec {
    pub public_ip: IpAddr,
    #[serde(default)]
    pub instance_id: Option<String>,
}

/// API server process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSpec {
    pub public_endpoint: Url,
    pub listen_port: u16,
    pub db_url: DatabaseUrl,
}

/// Containerized PostgreSQL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSpec {
    pub host: String,
    pub published_port: u16,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Security group attached to the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SecurityGroupSpec {
    #[serde(default)]
    pub inbound: Vec<FirewallRule>,
}

/// Everything the deployment promises about where things run
///
/// Loaded from a TOML manifest (see `deploy/topology.toml`) and checked with
/// [`crate::deployment::check`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentTopology {
    pub host: HostSpec,
    pub api: ApiSpec,
    pub database: DatabaseSpec,
    #[serde(default)]
    pub security_group: SecurityGroupSpec,
}

impl DeploymentTopology {
    /// The single-instance deployment the service was built for
    pub fn documented() -> DeploymentResult<Self> {
        Ok(Self {
            host: HostSpec {
                public_ip: IpAddr::from([54, 87, 44, 180]),
                instance_id: None,
            },
            api: ApiSpec {
                public_endpoint: Url::parse("http://54.87.44.180:8080")
                    .map_err(|e| DeploymentError::InvalidEndpoint(e.to_string()))?,
                listen_port: 8080,
                db_url: DatabaseUrl::parse(DEFAULT_DB_URL)?,
            },
            database: DatabaseSpec {
                host: "localhost".to_string(),
                published_port: 5432,
                name: "hr_database".to_string(),
                image: Some("postgres".to_string()),
            },
            security_group: SecurityGroupSpec {
                inbound: vec![
                    FirewallRule::tcp_from_anywhere(22, "SSH"),
                    FirewallRule::tcp_from_anywhere(8080, "API"),
                ],
            },
        })
    }

    pub fn from_toml_str(raw: &str) -> DeploymentResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> DeploymentResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Replaces the API process facts with what this process is actually using
    pub fn with_settings(mut self, settings: &Settings) -> DeploymentResult<Self> {
        self.api.listen_port = settings.port;
        self.api.db_url = DatabaseUrl::parse(&settings.db_url)?;
        Ok(self)
    }
}

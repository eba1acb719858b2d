//! Connection settings for the AsterixDB HTTP API

use crate::client::Dialect;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const HOST_PROPERTY: &str = "asterixdb.host";
pub const PORT_PROPERTY: &str = "asterixdb.port";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 19002;

/// Where and how to reach the cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host name of the HTTP API
    pub host: String,

    /// Port of the HTTP API
    pub port: u16,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Build a config from interpreter properties, keeping defaults for
    /// anything not set
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ClientError> {
        let mut config = ClientConfig::default();

        if let Some(host) = props.get(HOST_PROPERTY) {
            let host = host.trim();
            if !host.is_empty() {
                config.host = host.to_string();
            }
        }

        if let Some(port) = props.get(PORT_PROPERTY) {
            let port = port.trim();
            if !port.is_empty() {
                config.port = port.parse().map_err(|_| {
                    ClientError::Config(format!("{} must be a port number, got '{}'", PORT_PROPERTY, port))
                })?;
            }
        }

        Ok(config)
    }

    /// Query endpoint URL for a dialect
    pub fn endpoint(&self, dialect: Dialect) -> String {
        format!("http://{}:{}/{}", self.host, self.port, dialect.path())
    }
}

/// A configurable property the host shows to its users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub default: String,
    pub description: &'static str,
}

pub fn property_descriptors() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor {
            name: HOST_PROPERTY,
            default: DEFAULT_HOST.to_string(),
            description: "The host for AsterixDB HTTP API",
        },
        PropertyDescriptor {
            name: PORT_PROPERTY,
            default: DEFAULT_PORT.to_string(),
            description: "The port for AsterixDB HTTP API",
        },
    ]
}

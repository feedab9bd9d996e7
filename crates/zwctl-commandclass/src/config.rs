//! Handler configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zwctl_protocol::{EndpointId, NodeId};

/// Errors loading a handler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML could not be parsed.
    #[error("failed to parse handler config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Parsed but invalid.
    #[error("invalid handler config: {0}")]
    Invalid(String),
}

/// Binding of a handler to a node and endpoint.
///
/// ```yaml
/// node_id: 5
/// endpoint: 1
/// trace_payloads: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Node the handler talks to (the controller itself for serial API classes).
    pub node_id: u8,
    /// Endpoint on the node (0 = root device).
    pub endpoint: u8,
    /// Hex-dump request and response payloads in log output.
    pub trace_payloads: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig {
            node_id: 1,
            endpoint: 0,
            trace_payloads: false,
        }
    }
}

impl HandlerConfig {
    /// Config for `node_id`, root endpoint.
    pub fn for_node(node_id: u8) -> Self {
        HandlerConfig {
            node_id,
            ..Default::default()
        }
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: u8) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: HandlerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_id == 0 {
            return Err(ConfigError::Invalid("node_id 0 is not a valid node".to_string()));
        }
        Ok(())
    }

    /// Node as a protocol type.
    pub fn node(&self) -> NodeId {
        NodeId(self.node_id)
    }

    /// Endpoint as a protocol type.
    pub fn endpoint_id(&self) -> EndpointId {
        EndpointId(self.endpoint)
    }
}

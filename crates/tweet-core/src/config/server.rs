//! HTTP listener configuration for the two processes.

use serde::{Deserialize, Serialize};

/// Writer process (REST API) listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_api_port(),
        }
    }
}

impl ApiServerConfig {
    /// Returns the `host:port` socket address string.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Notifier process (websocket) listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_notifier_port")]
    pub port: u16,
    /// Path of the websocket upgrade endpoint.
    #[serde(default = "default_ws_path")]
    pub path: String,
}

impl Default for NotifierServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_notifier_port(),
            path: default_ws_path(),
        }
    }
}

impl NotifierServerConfig {
    /// Returns the `host:port` socket address string.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_notifier_port() -> u16 {
    8081
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

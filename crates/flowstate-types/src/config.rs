//! Server configuration types for Flowstate.
//!
//! `ServerConfig` represents the optional `config.toml` that controls the
//! listen address, CORS, and logging output. All fields have defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Flowstate server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin, method, and header.
    #[serde(default = "default_cors_allow_any")]
    pub cors_allow_any: bool,

    /// Bridge tracing spans to OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub enable_otel: bool,

    /// Emit log lines as JSON instead of the human-readable format.
    #[serde(default)]
    pub json_logs: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_allow_any() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allow_any: default_cors_allow_any(),
            enable_otel: false,
            json_logs: false,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert!(config.cors_allow_any);
        assert!(!config.enable_otel);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_server_config_deserialize_with_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_server_config_deserialize_with_values() {
        let toml_str = r#"
host = "0.0.0.0"
port = 8080
cors_allow_any = false
json_logs = true
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.cors_allow_any);
        assert!(config.json_logs);
        assert!(!config.enable_otel);
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }
}

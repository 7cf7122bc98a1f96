//! Server configuration loader for Flowstate.
//!
//! Reads an optional `config.toml` and deserializes it into
//! [`ServerConfig`]. A missing file is not an error: defaults apply.

use std::path::{Path, PathBuf};

use flowstate_types::config::ServerConfig;
use thiserror::Error;

/// Failure to read or parse an existing config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load server configuration from `path`.
///
/// - `None`, or a path that does not exist, yields [`ServerConfig::default()`].
/// - A file that cannot be read or parsed yields a [`ConfigError`]; the
///   caller decides whether to fall back to defaults.
pub async fn load_server_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ServerConfig::default());
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(ServerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<ServerConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply command-line overrides on top of the loaded file config.
pub fn apply_overrides(mut config: ServerConfig, host: Option<String>, port: Option<u16>) -> ServerConfig {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn no_path_returns_default() {
        let config = load_server_config(None).await.unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[tokio::test]
    async fn missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_server_config(Some(&tmp.path().join("config.toml")))
            .await
            .unwrap();
        assert_eq!(config.port, 5000);
    }

    #[tokio::test]
    async fn valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
host = "0.0.0.0"
port = 9090
enable_otel = true
"#,
        )
        .await
        .unwrap();

        let config = load_server_config(Some(&config_path)).await.unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert!(config.enable_otel);
        assert!(config.cors_allow_any);
    }

    #[tokio::test]
    async fn invalid_toml_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_server_config(Some(&config_path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = apply_overrides(ServerConfig::default(), Some("0.0.0.0".to_string()), None);
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");

        let config = apply_overrides(config, None, Some(8081));
        assert_eq!(config.listen_addr(), "0.0.0.0:8081");
    }
}

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::selection::store::DEFAULT_STATE_FILE;

/// Deployment stage the panel runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings for the selection panel service and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Read `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = setting("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let state_path = match lookup("SELECTION_STATE_PATH") {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyStatePath),
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_STATE_FILE),
        };

        Ok(Self {
            environment: AppEnvironment::parse(&setting("APP_ENV", "development")),
            server: ServerConfig {
                host: setting("APP_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: setting("APP_LOG_LEVEL", "info"),
            },
            storage: StorageConfig { state_path },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the selection state document lives.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub state_path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyStatePath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyStatePath => {
                write!(f, "SELECTION_STATE_PATH must not be empty when set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::EmptyStatePath => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_keys_fall_back_to_local_panel_defaults() {
        let config = config_from(&[]).expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(
            config.server.socket_addr().expect("default host parses"),
            SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000)
        );
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.storage.state_path, PathBuf::from("pj_app_data_v2.json"));
    }

    #[test]
    fn state_path_override_and_blank_value() {
        let config = config_from(&[("SELECTION_STATE_PATH", "/srv/pj/painel.json")])
            .expect("config loads");
        assert_eq!(config.storage.state_path, PathBuf::from("/srv/pj/painel.json"));

        assert!(matches!(
            config_from(&[("SELECTION_STATE_PATH", "  ")]),
            Err(ConfigError::EmptyStatePath)
        ));
    }

    #[test]
    fn classroom_deployment_settings() {
        let config = config_from(&[
            ("APP_ENV", "Production"),
            ("APP_HOST", "localhost"),
            ("APP_PORT", "8080"),
        ])
        .expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.server.socket_addr().expect("localhost resolves"),
            SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080)
        );
    }

    #[test]
    fn malformed_port_and_host_are_rejected() {
        assert!(matches!(
            config_from(&[("APP_PORT", "escola")]),
            Err(ConfigError::InvalidPort)
        ));

        let config = config_from(&[("APP_HOST", "sala-12")]).expect("host is checked lazily");
        assert!(matches!(
            config.server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }
}

//! Connection settings for ClickHouse executors.
//!
//! [`ClickHouseConfig::load`] reads the `clickhouse` section of
//! `config/config.toml` (optional) and then environment variables prefixed with
//! `CHORM__`, e.g. `CHORM__CLICKHOUSE__HOSTNAME=db.internal`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "CHORM";
const SECTION: &str = "clickhouse";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClickHouseConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Session database for the client; `None` keeps the server default. Engines
    /// that name a database are unaffected.
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default = "default_max_connections_per_event_loop")]
    pub max_connections_per_event_loop: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_user() -> String {
    "default".to_string()
}

fn default_max_connections_per_event_loop() -> usize {
    1
}

fn default_request_timeout_seconds() -> u64 {
    10
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections_per_event_loop: default_max_connections_per_event_loop(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ClickHouseConfig {
    /// Load from `config/config.toml`, overridden by `CHORM__` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the TOML file at `path` (optional), overridden by environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(settings) => settings,
            Err(err) => {
                // An unreadable file does not hide the environment
                if path.exists() {
                    log::warn!(
                        "failed to load {}, falling back to env: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, \
                             then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        match settings.get::<ClickHouseConfig>(SECTION) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => {
                log::debug!("no [{SECTION}] configuration found, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Message(format!(
                "ClickHouse configuration could not be loaded: {}",
                err
            ))),
        }
    }

    /// `hostname:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("chorm-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ClickHouseConfig::default();
        assert_eq!(config.address(), "localhost:9000");
        assert_eq!(config.max_connections_per_event_loop, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.database, None);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let path =
            std::env::temp_dir().join(format!("chorm-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = ClickHouseConfig::load_from(&path).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_load_from_file_section() {
        let path = write_config(
            "[clickhouse]\nhostname = \"ch.internal\"\nport = 9440\nuser = \"writer\"\npassword = \"secret\"\ndatabase = \"weather\"\nrequest_timeout_seconds = 30\n",
        );
        let config = ClickHouseConfig::load_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.address(), "ch.internal:9440");
        assert_eq!(config.user, "writer");
        assert_eq!(config.password, "secret");
        assert_eq!(config.database.as_deref(), Some("weather"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_connections_per_event_loop, 1);
    }

    #[test]
    fn test_invalid_section_is_an_error() {
        let path = write_config("[clickhouse]\nport = \"not a port\"\n");
        let result = ClickHouseConfig::load_from(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}

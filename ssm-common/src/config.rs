//! YAML configuration for the SSM server and client roles.
//!
//! Both roles read `config.yaml` from a directory named by an environment
//! variable. Credential fields name files inside that same directory, so a
//! deployment is a single directory holding the configuration and every
//! certificate and key it refers to.

use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::tls::TransportSecurityManager;

/// Environment variable naming the server configuration directory.
pub const SERVER_CONFIG_ENV: &str = "SSM_CONFIG_PATH";

/// Environment variable naming the client configuration directory.
pub const CLIENT_CONFIG_ENV: &str = "CLIENT_CONFIG_PATH";

/// File looked up inside the configuration directory.
const CONFIG_FILE: &str = "config.yaml";

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_timeout_secs() -> u64 {
    1
}

/// Server role configuration.
///
/// Read from `config.yaml` inside the directory named by
/// [`SERVER_CONFIG_ENV`]. All file fields are relative to that directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, an IP literal
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Server certificate chain file
    pub cert: String,
    /// Server private key file
    pub key: String,
    /// Trust bundle used to verify client certificates
    pub cacert: String,
    /// Whether connecting clients must present a certificate from the bundle
    #[serde(default)]
    pub require_client_auth: bool,
    /// Hex-encoded 32-byte data/record encryption key file
    pub drek: String,
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(skip)]
    config_dir: PathBuf,
}

impl ServerConfig {
    /// Loads and validates the configuration from the directory named by
    /// [`SERVER_CONFIG_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config_dir_from_env(SERVER_CONFIG_ENV)?)
    }

    /// Loads and validates the configuration from a directory.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let mut config: Self = read_config_file(&dir)?;
        config.config_dir = dir;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "host",
                "must be an IP address to bind",
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid_value("port", "must be nonzero"));
        }
        require_file_fields(&[
            ("cert", &self.cert),
            ("key", &self.key),
            ("cacert", &self.cacert),
            ("drek", &self.drek),
        ])
    }

    /// Socket address the server binds.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::invalid_value("host", "must be an IP address to bind"))
    }

    /// Directory the configuration was loaded from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Resolved path of the server certificate chain.
    #[must_use]
    pub fn cert_path(&self) -> PathBuf {
        self.config_dir.join(&self.cert)
    }

    /// Resolved path of the server private key.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.config_dir.join(&self.key)
    }

    /// Resolved path of the client-certificate trust bundle.
    #[must_use]
    pub fn cacert_path(&self) -> PathBuf {
        self.config_dir.join(&self.cacert)
    }

    /// Resolved path of the hex-encoded DREK file.
    #[must_use]
    pub fn drek_path(&self) -> PathBuf {
        self.config_dir.join(&self.drek)
    }

    /// Transport security material described by this configuration.
    #[must_use]
    pub fn transport_security(&self) -> TransportSecurityManager {
        TransportSecurityManager::new(self.cert_path(), self.key_path(), self.cacert_path())
    }
}

/// Client role configuration.
///
/// Read from `config.yaml` inside the directory named by
/// [`CLIENT_CONFIG_ENV`]. All file fields are relative to that directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Server host name or address; must match the server certificate
    pub host: String,
    /// Server port
    pub port: u16,
    /// Client certificate chain file
    pub cert: String,
    /// Client private key file
    pub key: String,
    /// Trust bundle used to verify the server certificate
    pub cacert: String,
    /// Per-call deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Log level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(skip)]
    config_dir: PathBuf,
}

impl ClientConfig {
    /// Loads and validates the configuration from the directory named by
    /// [`CLIENT_CONFIG_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config_dir_from_env(CLIENT_CONFIG_ENV)?)
    }

    /// Loads and validates the configuration from a directory.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        let mut config: Self = read_config_file(&dir)?;
        config.config_dir = dir;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::invalid_value("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid_value("port", "must be nonzero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "request_timeout_secs",
                "must be greater than 0",
            ));
        }
        require_file_fields(&[
            ("cert", &self.cert),
            ("key", &self.key),
            ("cacert", &self.cacert),
        ])
    }

    /// URL of the server endpoint.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }

    /// Per-call deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory the configuration was loaded from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Resolved path of the client certificate chain.
    #[must_use]
    pub fn cert_path(&self) -> PathBuf {
        self.config_dir.join(&self.cert)
    }

    /// Resolved path of the client private key.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.config_dir.join(&self.key)
    }

    /// Resolved path of the server trust bundle.
    #[must_use]
    pub fn cacert_path(&self) -> PathBuf {
        self.config_dir.join(&self.cacert)
    }

    /// Transport security material described by this configuration.
    #[must_use]
    pub fn transport_security(&self) -> TransportSecurityManager {
        TransportSecurityManager::new(self.cert_path(), self.key_path(), self.cacert_path())
    }
}

fn config_dir_from_env(var: &str) -> Result<PathBuf, ConfigError> {
    env::var(var)
        .map(PathBuf::from)
        .map_err(|_| ConfigError::missing_env(var))
}

fn read_config_file<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<T, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    let raw = fs::read_to_string(&path).map_err(|e| ConfigError::file_read(&path, e))?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::YamlParse { path, source })
}

fn require_file_fields(fields: &[(&'static str, &String)]) -> Result<(), ConfigError> {
    for (field, value) in fields {
        if value.is_empty() {
            return Err(ConfigError::invalid_value(field, "must name a file"));
        }
    }
    Ok(())
}

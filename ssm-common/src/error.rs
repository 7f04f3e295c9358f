//! Startup error types.
//!
//! Every variant here is fatal: these errors can only surface while a process
//! loads its configuration or transport credentials, before a listener opens
//! or a request is sent. Per-request failures travel in the reply status
//! instead and never use this type.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading configuration or building TLS credentials.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("environment variable {name} is not set")]
    MissingEnv {
        /// Name of the missing variable
        name: String,
    },

    /// A configuration or credential file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema
    #[error("failed to parse {}: {source}", .path.display())]
    YamlParse {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// A PEM file is missing the expected sections or cannot be decoded
    #[error("invalid PEM in {}: {reason}", .path.display())]
    InvalidPem {
        /// Path of the offending file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Key material failed validation
    #[error("invalid key material in {}: {reason}", .path.display())]
    InvalidKeyMaterial {
        /// Path of the offending file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A configuration value failed validation
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Field that failed validation
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Missing environment variable.
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::MissingEnv { name: name.into() }
    }

    /// Unreadable configuration or credential file.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// PEM file without the expected content.
    pub fn invalid_pem(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidPem {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Key file that does not hold a usable key.
    pub fn invalid_key_material(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Configuration value outside its allowed range.
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

//! Shared library for cross-cutting concerns in SSM processes.
//!
//! This crate provides centralized implementations for:
//! - YAML configuration loading for the server and client roles
//! - Transport security material (server and client TLS configurations)
//! - Startup error types
//! - Tracing initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod tls;
pub mod tracing_config;

pub use config::{ClientConfig, ServerConfig};
pub use error::ConfigError;
pub use tls::TransportSecurityManager;
pub use tracing_config::{init_tracing, TracingConfig};

//! Transport security material for the SSM gRPC endpoints.
//!
//! Builds tonic server and client TLS configurations from PEM files on disk.
//! Files are read and parsed eagerly so broken credentials fail process
//! startup instead of the first handshake. No sockets are touched here; the
//! returned configurations are applied when a listener or channel is built.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tonic::transport::{Certificate, ClientTlsConfig, Identity, ServerTlsConfig};

use crate::error::ConfigError;

/// Assembles TLS credentials for one endpoint from its three PEM files.
#[derive(Debug, Clone)]
pub struct TransportSecurityManager {
    cert: PathBuf,
    key: PathBuf,
    cacert: PathBuf,
}

impl TransportSecurityManager {
    /// Creates a manager over an identity (certificate chain plus private
    /// key) and a peer trust bundle.
    pub fn new(
        cert: impl Into<PathBuf>,
        key: impl Into<PathBuf>,
        cacert: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cert: cert.into(),
            key: key.into(),
            cacert: cacert.into(),
        }
    }

    /// Builds the server-side TLS configuration.
    ///
    /// The server always presents its identity. With `require_client_auth`
    /// set, the trust bundle is installed as the client-certificate root and
    /// connections without a valid client certificate are rejected during the
    /// handshake; otherwise clients are not asked for a certificate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any of the three files is unreadable or
    /// does not hold the expected PEM sections.
    pub fn server_tls(&self, require_client_auth: bool) -> Result<ServerTlsConfig, ConfigError> {
        let cert_pem = self.read_certificate_file(&self.cert)?;
        let key_pem = self.read_key_file(&self.key)?;
        let ca_pem = self.read_certificate_file(&self.cacert)?;

        let mut tls = ServerTlsConfig::new().identity(Identity::from_pem(cert_pem, key_pem));
        if require_client_auth {
            tls = tls.client_ca_root(Certificate::from_pem(ca_pem));
        }
        Ok(tls)
    }

    /// Builds the client-side TLS configuration for mutual authentication.
    ///
    /// The client presents its identity and verifies the server against the
    /// trust bundle alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any of the three files is unreadable or
    /// does not hold the expected PEM sections.
    pub fn client_tls(&self) -> Result<ClientTlsConfig, ConfigError> {
        let cert_pem = self.read_certificate_file(&self.cert)?;
        let key_pem = self.read_key_file(&self.key)?;
        let ca_pem = self.read_certificate_file(&self.cacert)?;

        Ok(ClientTlsConfig::new()
            .identity(Identity::from_pem(cert_pem, key_pem))
            .ca_certificate(Certificate::from_pem(ca_pem)))
    }

    /// Builds a client-side TLS configuration without a client identity.
    ///
    /// The server is verified against the platform's native root store with
    /// the trust bundle appended. Used by the simplified ping flow; a server
    /// that requires client certificates will reject these connections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the trust bundle is unreadable or holds no
    /// certificates.
    pub fn client_tls_system_roots(&self) -> Result<ClientTlsConfig, ConfigError> {
        let ca_pem = self.read_certificate_file(&self.cacert)?;

        Ok(ClientTlsConfig::new()
            .with_native_roots()
            .ca_certificate(Certificate::from_pem(ca_pem)))
    }

    fn read_certificate_file(&self, path: &Path) -> Result<Vec<u8>, ConfigError> {
        let pem = read_pem(path)?;
        let mut cursor = Cursor::new(pem.as_slice());
        let certs: Vec<_> = rustls_pemfile::certs(&mut cursor)
            .collect::<Result<_, _>>()
            .map_err(|e| ConfigError::invalid_pem(path, format!("failed to parse: {e}")))?;
        if certs.is_empty() {
            return Err(ConfigError::invalid_pem(path, "no certificates found"));
        }
        Ok(pem)
    }

    fn read_key_file(&self, path: &Path) -> Result<Vec<u8>, ConfigError> {
        let pem = read_pem(path)?;
        let mut cursor = Cursor::new(pem.as_slice());
        match rustls_pemfile::private_key(&mut cursor) {
            Ok(Some(_)) => Ok(pem),
            Ok(None) => Err(ConfigError::invalid_key_material(
                path,
                "no private key found",
            )),
            Err(e) => Err(ConfigError::invalid_key_material(
                path,
                format!("failed to parse: {e}"),
            )),
        }
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|e| ConfigError::file_read(path, e))
}

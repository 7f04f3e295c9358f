//! SsmClient wrapper over the generated gRPC stub.
//!
//! Connection setup, per-call deadlines, and reply interpretation. Transport
//! failures and service rejections surface as different [`ClientError`]
//! variants so callers can always tell whether the service answered.

use std::time::{Duration, Instant};

use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::Request;
use tracing::debug;

use ssm_common::{ClientConfig, ConfigError};

use crate::proto::ssm::v1::crypto_request::{KeyInfo, KeyType};
use crate::proto::ssm::v1::crypto_service_client::CryptoServiceClient;
use crate::proto::ssm::v1::{CryptoRequest, EmptyRequest, RandomRequest, SsmReply};

/// Protocol version carried in every request.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Algorithm requested for Encrypt and Decrypt.
pub const ALGORITHM: &str = "AES";

/// Key size in bits requested for Encrypt and Decrypt.
pub const BITS_LENGTH: i32 = 256;

/// Cipher mode requested for Encrypt and Decrypt.
pub const MODE: &str = "GCM";

/// Client-side error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Local configuration or credential problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint could not be reached or the channel failed.
    #[error("transport failure: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The call failed at the gRPC layer before the service answered.
    #[error("rpc failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// The service answered and rejected the request.
    #[error("rejected with status {status}: {message}")]
    Rejected {
        /// Negative status code from the reply.
        status: i32,
        /// Diagnostic message carried in the reply buffer.
        message: String,
    },

    /// Decrypt returned different bytes than were encrypted.
    #[error("decrypted output does not match the original input")]
    RoundTripMismatch,
}

/// Outcome of a single ping exchange.
#[derive(Debug, Clone)]
pub struct Pong {
    /// Payload returned by the server, an RFC 3339 timestamp.
    pub payload: String,
    /// Round-trip latency observed by the client.
    pub elapsed: Duration,
}

/// Client for the SSM service.
///
/// Cheap to share: every call clones the underlying channel, so methods take
/// `&self` and the client can be used from multiple tasks.
#[derive(Debug, Clone)]
pub struct SsmClient {
    grpc_client: CryptoServiceClient<Channel>,
    request_timeout: Duration,
}

impl SsmClient {
    /// Connects with mutual TLS: the client presents its certificate and
    /// verifies the server against the configured trust bundle.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let tls = config.transport_security().client_tls()?;
        Self::with_tls(config, tls)
    }

    /// Connects without a client identity: the server is verified against
    /// the native root store plus the configured trust bundle.
    pub async fn connect_with_system_roots(config: &ClientConfig) -> Result<Self, ClientError> {
        let tls = config.transport_security().client_tls_system_roots()?;
        Self::with_tls(config, tls)
    }

    fn with_tls(config: &ClientConfig, tls: ClientTlsConfig) -> Result<Self, ClientError> {
        let channel = Endpoint::from_shared(config.endpoint_url())?
            .tls_config(tls)?
            .timeout(config.request_timeout())
            .connect_lazy();

        Ok(Self {
            grpc_client: CryptoServiceClient::new(channel),
            request_timeout: config.request_timeout(),
        })
    }

    /// Sends one Ping and returns the payload with its round-trip time.
    pub async fn ping(&self) -> Result<Pong, ClientError> {
        let start = Instant::now();
        let mut client = self.grpc_client.clone();
        let reply = client
            .ping(self.request_with_deadline(EmptyRequest {}))
            .await?
            .into_inner();

        let payload = interpret_reply(reply)?;
        Ok(Pong {
            payload: String::from_utf8_lossy(&payload).into_owned(),
            elapsed: start.elapsed(),
        })
    }

    /// Encrypts a plaintext buffer, returning the sealed buffer.
    pub async fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, ClientError> {
        let request = crypto_request(KeyType::Encryption, plaintext);
        debug!(input_len = plaintext.len(), "Sending Encrypt");

        let mut client = self.grpc_client.clone();
        let reply = client
            .encrypt(self.request_with_deadline(request))
            .await?
            .into_inner();
        interpret_reply(reply)
    }

    /// Decrypts a sealed buffer, returning the recovered plaintext.
    pub async fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, ClientError> {
        let request = crypto_request(KeyType::Decryption, sealed);
        debug!(input_len = sealed.len(), "Sending Decrypt");

        let mut client = self.grpc_client.clone();
        let reply = client
            .decrypt(self.request_with_deadline(request))
            .await?
            .into_inner();
        interpret_reply(reply)
    }

    /// Requests `size` random bytes from the service.
    pub async fn get_random(&self, size: i32) -> Result<Vec<u8>, ClientError> {
        let request = RandomRequest {
            version: PROTOCOL_VERSION.to_string(),
            random_size: size,
        };
        debug!(random_size = size, "Sending GetRandom");

        let mut client = self.grpc_client.clone();
        let reply = client
            .get_random(self.request_with_deadline(request))
            .await?
            .into_inner();
        interpret_reply(reply)
    }

    fn request_with_deadline<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.request_timeout);
        request
    }
}

/// Builds the fixed-suite request body for Encrypt and Decrypt.
fn crypto_request(key_type: KeyType, input: &[u8]) -> CryptoRequest {
    CryptoRequest {
        version: PROTOCOL_VERSION.to_string(),
        key_type: key_type as i32,
        key_info: Some(KeyInfo {
            algorithm: ALGORITHM.to_string(),
            bits_length: BITS_LENGTH,
            mode: MODE.to_string(),
        }),
        input_buffer_size: input.len() as i32,
        input_buffer: input.to_vec(),
    }
}

/// Interprets a raw reply: status zero yields the output buffer, any other
/// status becomes [`ClientError::Rejected`] with the buffer decoded as the
/// diagnostic message.
///
/// Public so callers driving the generated stub directly can reuse the same
/// interpretation.
pub fn interpret_reply(reply: SsmReply) -> Result<Vec<u8>, ClientError> {
    if reply.status == 0 {
        Ok(reply.output_buffer)
    } else {
        Err(ClientError::Rejected {
            status: reply.status,
            message: String::from_utf8_lossy(&reply.output_buffer).into_owned(),
        })
    }
}

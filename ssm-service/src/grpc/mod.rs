//! gRPC service implementation.
//!
//! Implements the CryptoService with per-request correlation IDs. Business
//! failures always travel in the reply (negative status, message in the
//! output buffer) and never become a transport status, so a caller that
//! reaches the service can rely on getting a reply to interpret.

use std::sync::Arc;
use std::time::Instant;

use tonic::{Request, Response, Status};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::crypto::{random_bytes, CipherSuite, Drek};
use crate::error::CryptoError;
use crate::metrics;
use crate::proto::ssm::v1::crypto_request::KeyType;
use crate::proto::ssm::v1::crypto_service_server::CryptoService;
use crate::proto::ssm::v1::{CryptoRequest, EmptyRequest, RandomRequest, SsmReply};

/// Fixed size of GetRandom output in bytes.
pub const FIXED_RANDOM_SIZE: i32 = 32;

/// Smallest accepted plaintext or ciphertext buffer.
pub const MIN_BLOCK_SIZE: usize = 16;

/// Largest accepted plaintext or ciphertext buffer.
pub const MAX_BLOCK_SIZE: usize = 4096;

/// CryptoService implementation over an injected immutable DREK.
pub struct CryptoServiceImpl {
    drek: Arc<Drek>,
}

impl CryptoServiceImpl {
    /// Creates the service around the process-wide key.
    #[must_use]
    pub fn new(drek: Arc<Drek>) -> Self {
        Self { drek }
    }

    /// Generates a new correlation ID for request tracing.
    fn generate_correlation_id() -> Uuid {
        Uuid::new_v4()
    }

    /// Builds the failure reply for a business error.
    fn error_reply(err: &CryptoError) -> SsmReply {
        let message = err.to_string().into_bytes();
        SsmReply {
            status: err.code(),
            output_buffer_size: message.len() as i32,
            output_buffer: message,
        }
    }

    /// Builds the success reply around an output buffer.
    fn ok_reply(output: Vec<u8>) -> SsmReply {
        SsmReply {
            status: 0,
            output_buffer_size: output.len() as i32,
            output_buffer: output,
        }
    }

    /// Runs the Encrypt/Decrypt gate sequence and resolves the cipher suite.
    ///
    /// Checks run in a fixed order (key type, algorithm, key size, mode,
    /// bounds) and all complete before any cryptographic work starts. Bounds
    /// apply to the received buffer itself; the size field in the request is
    /// advisory and never trusted.
    fn validate_crypto_request(
        request: &CryptoRequest,
        expected: KeyType,
    ) -> Result<CipherSuite, CryptoError> {
        if request.key_type() != expected {
            return Err(CryptoError::KeyTypeMismatch);
        }

        let suite = match request.key_info.as_ref() {
            Some(info) => CipherSuite::resolve(&info.algorithm, info.bits_length, &info.mode)?,
            // An absent tuple cannot name a supported algorithm
            None => return Err(CryptoError::UnsupportedAlgorithm),
        };

        if !is_valid_block_size(request.input_buffer.len()) {
            return Err(CryptoError::InputOutOfBounds);
        }

        Ok(suite)
    }

    fn draw_random(size: i32) -> Result<Vec<u8>, CryptoError> {
        if size != FIXED_RANDOM_SIZE {
            return Err(CryptoError::RandomSizeUnsupported);
        }
        random_bytes(FIXED_RANDOM_SIZE as usize)
    }
}

const fn is_valid_block_size(len: usize) -> bool {
    len >= MIN_BLOCK_SIZE && len <= MAX_BLOCK_SIZE
}

#[tonic::async_trait]
impl CryptoService for CryptoServiceImpl {
    #[instrument(
        skip(self, request),
        fields(correlation_id = %Self::generate_correlation_id())
    )]
    async fn encrypt(
        &self,
        request: Request<CryptoRequest>,
    ) -> Result<Response<SsmReply>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let reply = match Self::validate_crypto_request(&req, KeyType::Encryption)
            .and_then(|suite| suite.seal(&self.drek, &req.input_buffer))
        {
            Ok(sealed) => {
                info!(
                    input_len = req.input_buffer.len(),
                    output_len = sealed.len(),
                    "Encrypt completed"
                );
                metrics::record_operation("encrypt", "ok");
                Self::ok_reply(sealed)
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "Encrypt rejected");
                metrics::record_operation("encrypt", err.label());
                Self::error_reply(&err)
            }
        };

        metrics::record_grpc_latency("Encrypt", start.elapsed().as_secs_f64());
        Ok(Response::new(reply))
    }

    #[instrument(
        skip(self, request),
        fields(correlation_id = %Self::generate_correlation_id())
    )]
    async fn decrypt(
        &self,
        request: Request<CryptoRequest>,
    ) -> Result<Response<SsmReply>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let reply = match Self::validate_crypto_request(&req, KeyType::Decryption)
            .and_then(|suite| suite.open(&self.drek, &req.input_buffer))
        {
            Ok(plaintext) => {
                info!(output_len = plaintext.len(), "Decrypt completed");
                metrics::record_operation("decrypt", "ok");
                Self::ok_reply(plaintext)
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "Decrypt rejected");
                metrics::record_operation("decrypt", err.label());
                Self::error_reply(&err)
            }
        };

        metrics::record_grpc_latency("Decrypt", start.elapsed().as_secs_f64());
        Ok(Response::new(reply))
    }

    #[instrument(
        skip(self, request),
        fields(correlation_id = %Self::generate_correlation_id())
    )]
    async fn get_random(
        &self,
        request: Request<RandomRequest>,
    ) -> Result<Response<SsmReply>, Status> {
        let start = Instant::now();
        let req = request.into_inner();

        let reply = match Self::draw_random(req.random_size) {
            Ok(bytes) => {
                info!(random_size = req.random_size, "GetRandom completed");
                metrics::record_operation("get_random", "ok");
                Self::ok_reply(bytes)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    code = err.code(),
                    random_size = req.random_size,
                    "GetRandom rejected"
                );
                metrics::record_operation("get_random", err.label());
                Self::error_reply(&err)
            }
        };

        metrics::record_grpc_latency("GetRandom", start.elapsed().as_secs_f64());
        Ok(Response::new(reply))
    }

    #[instrument(
        skip(self, request),
        fields(correlation_id = %Self::generate_correlation_id())
    )]
    async fn ping(&self, request: Request<EmptyRequest>) -> Result<Response<SsmReply>, Status> {
        let start = Instant::now();
        let EmptyRequest {} = request.into_inner();

        // The payload is opaque to clients; RFC 3339 keeps it readable
        let timestamp = chrono::Utc::now().to_rfc3339();
        info!("Ping");
        metrics::record_operation("ping", "ok");

        let reply = Self::ok_reply(timestamp.into_bytes());
        metrics::record_grpc_latency("Ping", start.elapsed().as_secs_f64());
        Ok(Response::new(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::ssm::v1::crypto_request::KeyInfo;

    fn service() -> CryptoServiceImpl {
        CryptoServiceImpl::new(Arc::new(Drek::new([0x42; 32])))
    }

    fn aes_key_info() -> Option<KeyInfo> {
        Some(KeyInfo {
            algorithm: "AES".to_string(),
            bits_length: 256,
            mode: "GCM".to_string(),
        })
    }

    fn crypto_request(key_type: KeyType, input: &[u8]) -> CryptoRequest {
        CryptoRequest {
            version: "1.0".to_string(),
            key_type: key_type as i32,
            key_info: aes_key_info(),
            input_buffer: input.to_vec(),
            input_buffer_size: input.len() as i32,
        }
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = CryptoServiceImpl::error_reply(&CryptoError::InputOutOfBounds);
        assert_eq!(reply.status, CryptoError::InputOutOfBounds.code());
        assert_eq!(reply.output_buffer, b"input buffer out of bounds");
        assert_eq!(reply.output_buffer_size, reply.output_buffer.len() as i32);
    }

    #[test]
    fn test_ok_reply_shape() {
        let reply = CryptoServiceImpl::ok_reply(vec![1, 2, 3]);
        assert_eq!(reply.status, 0);
        assert_eq!(reply.output_buffer, vec![1, 2, 3]);
        assert_eq!(reply.output_buffer_size, 3);
    }

    #[test]
    fn test_key_type_checked_before_algorithm() {
        let mut req = crypto_request(KeyType::Decryption, &[0u8; 32]);
        if let Some(info) = req.key_info.as_mut() {
            info.algorithm = "rsa".to_string();
        }

        // Everything is wrong; the key type gate fires first
        let err =
            CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption).unwrap_err();
        assert_eq!(err, CryptoError::KeyTypeMismatch);
    }

    #[test]
    fn test_missing_key_info_rejected_as_algorithm() {
        let mut req = crypto_request(KeyType::Encryption, &[0u8; 32]);
        req.key_info = None;

        let err =
            CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption).unwrap_err();
        assert_eq!(err, CryptoError::UnsupportedAlgorithm);
    }

    #[test]
    fn test_unknown_key_type_value_rejected() {
        let mut req = crypto_request(KeyType::Encryption, &[0u8; 32]);
        req.key_type = 77;

        let err =
            CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption).unwrap_err();
        assert_eq!(err, CryptoError::KeyTypeMismatch);
    }

    #[test]
    fn test_bounds_use_actual_buffer_not_size_field() {
        // Small buffer with an inflated size field still fails
        let mut req = crypto_request(KeyType::Encryption, &[0u8; 8]);
        req.input_buffer_size = 100;
        let err =
            CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption).unwrap_err();
        assert_eq!(err, CryptoError::InputOutOfBounds);

        // Valid buffer with a zero size field still passes
        let mut req = crypto_request(KeyType::Encryption, &[0u8; 16]);
        req.input_buffer_size = 0;
        assert!(CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption).is_ok());
    }

    #[test]
    fn test_bounds_range_edges() {
        for (len, ok) in [
            (MIN_BLOCK_SIZE - 1, false),
            (MIN_BLOCK_SIZE, true),
            (MAX_BLOCK_SIZE, true),
            (MAX_BLOCK_SIZE + 1, false),
        ] {
            let req = crypto_request(KeyType::Encryption, &vec![0u8; len]);
            let result = CryptoServiceImpl::validate_crypto_request(&req, KeyType::Encryption);
            assert_eq!(result.is_ok(), ok, "len = {len}");
        }
    }

    #[test]
    fn test_draw_random_gates_size() {
        assert_eq!(
            CryptoServiceImpl::draw_random(16).unwrap_err(),
            CryptoError::RandomSizeUnsupported
        );
        assert_eq!(CryptoServiceImpl::draw_random(32).unwrap().len(), 32);
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_handlers_round_trip() {
        let svc = service();
        let plaintext = b"Hello cryptoServicer!".to_vec();

        let encrypted = svc
            .encrypt(Request::new(crypto_request(KeyType::Encryption, &plaintext)))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(encrypted.status, 0);
        assert_eq!(
            encrypted.output_buffer_size,
            encrypted.output_buffer.len() as i32
        );

        let decrypted = svc
            .decrypt(Request::new(crypto_request(
                KeyType::Decryption,
                &encrypted.output_buffer,
            )))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(decrypted.status, 0);
        assert_eq!(decrypted.output_buffer, plaintext);
    }

    #[tokio::test]
    async fn test_decrypt_reports_malformed_before_auth() {
        let svc = service();

        // 16 bytes passes bounds but cannot hold nonce + tag
        let reply = svc
            .decrypt(Request::new(crypto_request(KeyType::Decryption, &[0u8; 16])))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(reply.status, CryptoError::MalformedCiphertext.code());
        assert_eq!(reply.output_buffer, b"invalid ciphertext");
    }

    #[tokio::test]
    async fn test_ping_returns_rfc3339_timestamp() {
        let svc = service();
        let reply = svc
            .ping(Request::new(EmptyRequest {}))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(reply.status, 0);
        let text = String::from_utf8(reply.output_buffer).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&text).is_ok());
    }
}

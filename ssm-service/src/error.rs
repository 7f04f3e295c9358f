//! Business error types for the crypto service.
//!
//! These errors travel inside the reply (negative status code, message in
//! the output buffer). They are never converted to a transport status; a
//! request that reaches a handler always gets a reply.

use thiserror::Error;

/// Failures of a single crypto-service operation.
///
/// Each variant maps to a stable negative status code via [`code`], and its
/// display form is the message placed in the reply's output buffer.
///
/// [`code`]: CryptoError::code
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Request key type does not match the operation
    #[error("key_name not matched")]
    KeyTypeMismatch,

    /// Requested algorithm is outside the supported set
    #[error("not supported algorithm")]
    UnsupportedAlgorithm,

    /// Requested key size is outside the supported set
    #[error("key_size not supported")]
    UnsupportedKeySize,

    /// Requested mode is outside the supported set
    #[error("mode not supported")]
    UnsupportedMode,

    /// Input buffer length outside the accepted range
    #[error("input buffer out of bounds")]
    InputOutOfBounds,

    /// Buffer too short to carry a nonce and a tag
    #[error("invalid ciphertext")]
    MalformedCiphertext,

    /// Tag verification failed during decryption
    #[error("message authentication failed")]
    AuthenticationFailed,

    /// Requested random size is not the fixed supported size
    #[error("random_size not supported")]
    RandomSizeUnsupported,

    /// Cipher construction or random source failure
    #[error("internal error: {reason}")]
    Internal {
        /// What failed
        reason: String,
    },
}

impl CryptoError {
    /// Stable negative status code carried in the reply.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Internal { .. } => -1,
            Self::KeyTypeMismatch => -2,
            Self::UnsupportedAlgorithm => -3,
            Self::UnsupportedKeySize => -4,
            Self::UnsupportedMode => -5,
            Self::InputOutOfBounds => -6,
            Self::MalformedCiphertext => -7,
            Self::AuthenticationFailed => -8,
            Self::RandomSizeUnsupported => -9,
        }
    }

    /// Short outcome label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Internal { .. } => "internal",
            Self::KeyTypeMismatch => "key_type",
            Self::UnsupportedAlgorithm => "algorithm",
            Self::UnsupportedKeySize => "key_size",
            Self::UnsupportedMode => "mode",
            Self::InputOutOfBounds => "bounds",
            Self::MalformedCiphertext => "ciphertext",
            Self::AuthenticationFailed => "auth",
            Self::RandomSizeUnsupported => "random_size",
        }
    }

    /// Internal failure with a reason.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<CryptoError> {
        vec![
            CryptoError::KeyTypeMismatch,
            CryptoError::UnsupportedAlgorithm,
            CryptoError::UnsupportedKeySize,
            CryptoError::UnsupportedMode,
            CryptoError::InputOutOfBounds,
            CryptoError::MalformedCiphertext,
            CryptoError::AuthenticationFailed,
            CryptoError::RandomSizeUnsupported,
            CryptoError::internal("boom"),
        ]
    }

    #[test]
    fn test_codes_are_negative_and_distinct() {
        let codes: Vec<i32> = all_variants().iter().map(CryptoError::code).collect();
        for code in &codes {
            assert!(*code < 0);
        }
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_messages_keep_service_vocabulary() {
        assert_eq!(CryptoError::KeyTypeMismatch.to_string(), "key_name not matched");
        assert_eq!(
            CryptoError::UnsupportedAlgorithm.to_string(),
            "not supported algorithm"
        );
        assert_eq!(
            CryptoError::InputOutOfBounds.to_string(),
            "input buffer out of bounds"
        );
        assert_eq!(
            CryptoError::RandomSizeUnsupported.to_string(),
            "random_size not supported"
        );
    }
}

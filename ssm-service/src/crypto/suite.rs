//! Cipher-suite registry.
//!
//! The supported {algorithm, key size, mode} tuples form a closed set. A
//! request tuple either resolves to a member or is rejected with an error
//! naming the first dimension that failed; call sites never compare
//! algorithm strings themselves. Adding a suite means adding a variant here.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::crypto::drek::Drek;
use crate::crypto::random_bytes;
use crate::error::CryptoError;

/// Supported cipher suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    /// AES with a 256-bit key in Galois/Counter Mode
    Aes256Gcm,
}

impl CipherSuite {
    /// Resolves a requested tuple against the supported set.
    ///
    /// String dimensions match case-insensitively. Dimensions are checked in
    /// order: algorithm, key size, mode.
    ///
    /// # Errors
    ///
    /// One of [`CryptoError::UnsupportedAlgorithm`],
    /// [`CryptoError::UnsupportedKeySize`], [`CryptoError::UnsupportedMode`]
    /// for the first dimension outside the set.
    pub fn resolve(algorithm: &str, bits_length: i32, mode: &str) -> Result<Self, CryptoError> {
        if !algorithm.eq_ignore_ascii_case("aes") {
            return Err(CryptoError::UnsupportedAlgorithm);
        }
        if bits_length != 256 {
            return Err(CryptoError::UnsupportedKeySize);
        }
        if !mode.eq_ignore_ascii_case("gcm") {
            return Err(CryptoError::UnsupportedMode);
        }
        Ok(Self::Aes256Gcm)
    }

    /// Nonce length in bytes.
    #[must_use]
    pub const fn nonce_len(self) -> usize {
        match self {
            Self::Aes256Gcm => 12,
        }
    }

    /// Authentication tag length in bytes.
    #[must_use]
    pub const fn tag_len(self) -> usize {
        match self {
            Self::Aes256Gcm => 16,
        }
    }

    /// Smallest buffer [`open`] accepts: one nonce plus one tag.
    ///
    /// [`open`]: CipherSuite::open
    #[must_use]
    pub const fn min_sealed_len(self) -> usize {
        self.nonce_len() + self.tag_len()
    }

    /// Encrypts `plaintext` under `drek` with a fresh random nonce.
    ///
    /// The output layout is `nonce || ciphertext || tag`, the only form
    /// [`open`] accepts.
    ///
    /// [`open`]: CipherSuite::open
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Internal`] if cipher construction or the
    /// random source fails.
    pub fn seal(self, drek: &Drek, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Aes256Gcm => {
                let cipher = Aes256Gcm::new_from_slice(drek.as_bytes())
                    .map_err(|e| CryptoError::internal(format!("cipher init failed: {e}")))?;

                let nonce_bytes = random_bytes(self.nonce_len())?;
                let nonce = Nonce::from_slice(&nonce_bytes);

                // The aead crate appends the tag to the ciphertext
                let ciphertext = cipher
                    .encrypt(nonce, plaintext)
                    .map_err(|e| CryptoError::internal(format!("encrypt failed: {e}")))?;

                let mut sealed = Vec::with_capacity(nonce_bytes.len() + ciphertext.len());
                sealed.extend_from_slice(&nonce_bytes);
                sealed.extend_from_slice(&ciphertext);
                Ok(sealed)
            }
        }
    }

    /// Decrypts a buffer produced by [`seal`].
    ///
    /// [`seal`]: CipherSuite::seal
    ///
    /// # Errors
    ///
    /// [`CryptoError::MalformedCiphertext`] when the buffer cannot carry a
    /// nonce and a tag; [`CryptoError::AuthenticationFailed`] when tag
    /// verification fails. The length check runs before any cipher work.
    pub fn open(self, drek: &Drek, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Self::Aes256Gcm => {
                if sealed.len() < self.min_sealed_len() {
                    return Err(CryptoError::MalformedCiphertext);
                }

                let cipher = Aes256Gcm::new_from_slice(drek.as_bytes())
                    .map_err(|e| CryptoError::internal(format!("cipher init failed: {e}")))?;

                let (nonce_bytes, ciphertext) = sealed.split_at(self.nonce_len());
                let nonce = Nonce::from_slice(nonce_bytes);

                cipher
                    .decrypt(nonce, ciphertext)
                    .map_err(|_| CryptoError::AuthenticationFailed)
            }
        }
    }
}

//! Cryptographic core: the DREK container, the cipher-suite registry, and
//! the random source.

pub mod drek;
pub mod suite;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

pub use drek::Drek;
pub use suite::CipherSuite;

/// Draws `len` bytes from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`CryptoError::Internal`] if the random source fails; no partial
/// output is ever returned.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::internal(format!("random source failed: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length_and_variation() {
        let a = random_bytes(32).unwrap();
        let b = random_bytes(32).unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(b.len(), 32);
        // 32 zero bytes or a repeat would mean the source is not drawing
        assert_ne!(a, vec![0u8; 32]);
        assert_ne!(a, b);
    }
}

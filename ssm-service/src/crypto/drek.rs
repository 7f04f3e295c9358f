//! Data/record encryption key container.
//!
//! The DREK is loaded once at startup from a hex-encoded file inside the
//! configuration directory and injected into the service as an immutable
//! value. It is never transmitted, never printed through `Debug`, and its
//! bytes are wiped when the container drops.

use std::fmt;
use std::fs;
use std::path::Path;

use ssm_common::ConfigError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the DREK in bytes (AES-256).
pub const DREK_LEN: usize = 32;

/// Process-wide data/record encryption key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Drek {
    key: [u8; DREK_LEN],
}

impl Drek {
    /// Wraps raw key bytes.
    #[must_use]
    pub fn new(key: [u8; DREK_LEN]) -> Self {
        Self { key }
    }

    /// Loads the key from a hex-encoded file.
    ///
    /// Surrounding whitespace is ignored; the decoded value must be exactly
    /// [`DREK_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable, not valid hex, or
    /// decodes to the wrong length. All of these are fatal at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::file_read(path, e))?;

        let decoded = hex::decode(raw.trim())
            .map_err(|e| ConfigError::invalid_key_material(path, format!("not valid hex: {e}")))?;

        let key: [u8; DREK_LEN] = decoded.try_into().map_err(|_| {
            ConfigError::invalid_key_material(path, format!("must decode to {DREK_LEN} bytes"))
        })?;

        Ok(Self::new(key))
    }

    /// Key bytes for cipher construction.
    pub(crate) fn as_bytes(&self) -> &[u8; DREK_LEN] {
        &self.key
    }
}

impl fmt::Debug for Drek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Drek(..)")
    }
}

//! Operator flows built on top of [`SsmClient`].
//!
//! Each flow corresponds to one of the operator binaries and keeps the
//! binaries themselves down to argument parsing and exit codes.

use tracing::{info, warn};

use crate::client::{ClientError, SsmClient};

/// Pings sent when no count argument is given.
pub const DEFAULT_PING_COUNT: u32 = 4;

/// Tally of a [`ping_many`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingSummary {
    /// Pings attempted.
    pub attempted: u32,
    /// Pings answered with a success reply.
    pub succeeded: u32,
}

impl PingSummary {
    /// True when every attempted ping succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.succeeded == self.attempted
    }
}

/// Issues `count` sequential pings, logging each outcome.
///
/// A failed ping is logged and counted but does not stop the run, so one
/// summary covers flaky paths as well as healthy ones.
pub async fn ping_many(client: &SsmClient, count: u32) -> PingSummary {
    let mut summary = PingSummary {
        attempted: count,
        succeeded: 0,
    };

    for seq in 1..=count {
        match client.ping().await {
            Ok(pong) => {
                info!(
                    seq,
                    elapsed_ms = pong.elapsed.as_millis() as u64,
                    payload = %pong.payload,
                    "Pong"
                );
                summary.succeeded += 1;
            }
            Err(err) => {
                warn!(seq, error = %err, "Ping failed");
            }
        }
    }

    summary
}

/// Encrypts a plaintext, decrypts the result, and verifies the round trip.
///
/// Returns the recovered plaintext; a mismatch against the original input is
/// [`ClientError::RoundTripMismatch`].
pub async fn encrypt_then_decrypt(
    client: &SsmClient,
    plaintext: &[u8],
) -> Result<Vec<u8>, ClientError> {
    let sealed = client.encrypt(plaintext).await?;
    info!(
        plaintext_len = plaintext.len(),
        sealed_len = sealed.len(),
        "Encrypt accepted"
    );

    let recovered = client.decrypt(&sealed).await?;
    if recovered != plaintext {
        return Err(ClientError::RoundTripMismatch);
    }

    info!(recovered_len = recovered.len(), "Round trip verified");
    Ok(recovered)
}

/// Requests `size` random bytes and returns them hex encoded.
pub async fn fetch_random(client: &SsmClient, size: i32) -> Result<String, ClientError> {
    let bytes = client.get_random(size).await?;
    info!(random_size = size, returned = bytes.len(), "GetRandom accepted");
    Ok(hex::encode(bytes))
}

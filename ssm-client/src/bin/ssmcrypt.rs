//! Encrypt/Decrypt round-trip check over mutual TLS.
//!
//! Encrypts a message, decrypts the sealed buffer, and verifies the
//! recovered plaintext matches. Usage: `ssmcrypt [plaintext]`.

use ssm_client::{ops, SsmClient};
use ssm_common::{init_tracing, ClientConfig, TracingConfig};

const DEFAULT_MESSAGE: &str = "Hello cryptoServicer!";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    init_tracing(&TracingConfig::default().with_log_level(&config.log_level));

    let message = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

    let client = SsmClient::connect(&config).await?;
    let recovered = ops::encrypt_then_decrypt(&client, message.as_bytes()).await?;

    println!(
        "round trip ok: {}",
        String::from_utf8_lossy(&recovered)
    );
    Ok(())
}

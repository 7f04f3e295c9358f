//! GetRandom exercise over mutual TLS.
//!
//! Requests the supported 32-byte size, then the unsupported 16-byte size,
//! and checks the service accepts the first and refuses the second.

use ssm_client::{ops, ClientError, SsmClient};
use ssm_common::{init_tracing, ClientConfig, TracingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    init_tracing(&TracingConfig::default().with_log_level(&config.log_level));

    let client = SsmClient::connect(&config).await?;

    let random = ops::fetch_random(&client, 32).await?;
    println!("32 random bytes: {random}");

    match ops::fetch_random(&client, 16).await {
        Err(ClientError::Rejected { status, message }) => {
            println!("16-byte request refused as expected: status {status}: {message}");
            Ok(())
        }
        Ok(_) => {
            eprintln!("16-byte request unexpectedly accepted");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

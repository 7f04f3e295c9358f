//! Liveness probe over server-authenticated TLS.
//!
//! Verifies the server against the native root store plus the configured
//! trust bundle without presenting a client identity. Usage:
//! `ssmping [count]`.

use ssm_client::{ops, SsmClient, DEFAULT_PING_COUNT};
use ssm_common::{init_tracing, ClientConfig, TracingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    init_tracing(&TracingConfig::default().with_log_level(&config.log_level));

    let count = match std::env::args().nth(1) {
        Some(raw) => raw.parse()?,
        None => DEFAULT_PING_COUNT,
    };

    let client = SsmClient::connect_with_system_roots(&config).await?;
    let summary = ops::ping_many(&client, count).await;

    println!(
        "{} of {} pings to {} succeeded",
        summary.succeeded,
        summary.attempted,
        config.endpoint_url()
    );
    if !summary.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

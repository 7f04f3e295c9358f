//! SSM Service - Main Entry Point
//!
//! Serves Encrypt, Decrypt, GetRandom, and Ping over TLS or mutual TLS with
//! structured logging and graceful shutdown.

use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use ssm_common::{init_tracing, ServerConfig, TracingConfig};
use ssm_service::proto::ssm::v1::crypto_service_server::CryptoServiceServer;
use ssm_service::{shutdown, CryptoServiceImpl, Drek};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let tracing_config = TracingConfig::default().with_log_level(&config.log_level);
    init_tracing(&tracing_config);

    info!("Starting SSM Service");

    // The DREK is loaded once and never changes for the process lifetime
    let drek = Arc::new(Drek::load(config.drek_path())?);

    let tls = config
        .transport_security()
        .server_tls(config.require_client_auth)?;
    let addr = config.listen_addr()?;

    let crypto_service = CryptoServiceImpl::new(drek);

    info!(
        require_client_auth = config.require_client_auth,
        "SSM Service listening on {}", addr
    );

    Server::builder()
        .tls_config(tls)?
        .add_service(CryptoServiceServer::new(crypto_service))
        .serve_with_shutdown(addr, shutdown::wait_for_signal())
        .await?;

    info!("SSM Service stopped");

    Ok(())
}

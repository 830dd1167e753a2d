use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use storage_proxy::config::{load_config, ProxyConfig};
use storage_proxy::http::HttpServer;
use storage_proxy::lifecycle::{signals, Shutdown};
use storage_proxy::observability::{logging, metrics};
use storage_proxy::storage::{
    AcceptAll, MemoryStore, Service, StorageService, SystemValidator, TelemetryMw, Validator,
};

#[derive(Parser)]
#[command(name = "storage-proxy")]
#[command(about = "Storage configuration proxy", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("storage-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        validate = config.storage.validate,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = build_service(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    HttpServer::new(config, service)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_service(config: &ProxyConfig) -> Arc<dyn StorageService> {
    let validator: Box<dyn Validator> = if config.storage.validate {
        Box::new(SystemValidator::new(
            config.storage.supported_types.clone(),
            Duration::from_secs(config.timeouts.validation_secs),
        ))
    } else {
        tracing::warn!("Storage validation disabled, registrations are stored unchecked");
        Box::new(AcceptAll)
    };

    let service = Service::new(MemoryStore::new(), validator);
    Arc::new(TelemetryMw::new(service).with_redaction(config.observability.redact_secrets))
}

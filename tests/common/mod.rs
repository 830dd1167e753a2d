//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use storage_proxy::config::ProxyConfig;
use storage_proxy::http::HttpServer;
use storage_proxy::lifecycle::Shutdown;
use storage_proxy::storage::{AcceptAll, MemoryStore, Service, StorageService, TelemetryMw};

/// A proxy serving on a loopback port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestProxy {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the server and wait for it to finish draining.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .expect("server task panicked")
            .expect("server failed");
    }
}

/// Start a proxy backed by an in-memory store that accepts every system.
pub async fn start_proxy() -> TestProxy {
    let service = TelemetryMw::new(Service::new(MemoryStore::new(), AcceptAll));
    start_proxy_with(ProxyConfig::default(), Arc::new(service)).await
}

pub async fn start_proxy_with(config: ProxyConfig, service: Arc<dyn StorageService>) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, service);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestProxy {
        addr,
        shutdown,
        handle,
    }
}

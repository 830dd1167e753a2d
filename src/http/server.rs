//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the storage handler
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{make_request_span, X_REQUEST_ID};
use crate::http::storage_handler::StorageHandler;
use crate::observability::metrics;
use crate::storage::StorageService;

/// HTTP server for the storage proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server answering storage requests with `service`.
    pub fn new(config: ProxyConfig, service: Arc<dyn StorageService>) -> Self {
        Self {
            router: Self::build_router(&config, service),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, service: Arc<dyn StorageService>) -> Router {
        let call_timeout = Duration::from_secs(config.timeouts.request_secs);

        StorageHandler::new(service, call_timeout)
            .router()
            .layer(middleware::from_fn(track_requests))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

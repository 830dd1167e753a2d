//! Storage configuration proxy.
//!
//! Serves storage registrations over HTTP and records a span, log line and
//! timing for every call into the storage service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server (request id, trace, limits, metrics)
//!                    │
//!                    ▼
//!               http::storage_handler (decode, status mapping)
//!                    │
//!                    ▼
//!               storage::TelemetryMw (span, log, timing)
//!                    │
//!                    ▼
//!               storage::Service ──▶ Validator (probe array)
//!                    │
//!                    ▼
//!               storage::Store (current registrations)
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use storage::StorageService;

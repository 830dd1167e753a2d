//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http request span (tower-http TraceLayer, request id)
//!     → storage.* spans (storage::telemetry)
//!         → tracing.rs (error status on failed calls)
//!         → metrics.rs (call counters and latency)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Spans follow OpenTelemetry field conventions (`otel.status_code`) so an
//!   exporter layer can be added without touching instrumented code
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
pub mod tracing;

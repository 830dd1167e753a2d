//! Span conventions for the storage service chain.
//!
//! Spans carry OpenTelemetry-style status fields. They must be declared empty
//! when the span is opened so they can be filled in on failure.

use tracing::Span;

/// Span field holding the call status.
pub const STATUS_CODE_FIELD: &str = "otel.status_code";

/// Span field holding the failure message.
pub const ERROR_FIELD: &str = "error";

pub const STATUS_ERROR: &str = "ERROR";

/// Mark `span` as failed and record `err` on it.
pub fn record_error(span: &Span, err: &dyn std::error::Error) {
    span.record(STATUS_CODE_FIELD, STATUS_ERROR);
    span.record(ERROR_FIELD, tracing::field::display(err));
    tracing::error!(parent: span, error = %err, "storage call failed");
}

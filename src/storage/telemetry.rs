//! Logging and tracing decorator for any [`StorageService`].
//!
//! Every call gets a child span of the current span named after the
//! operation, one info line carrying the request fields, and a debug line
//! with the elapsed time once the call is over. The timing line is emitted by
//! a drop guard, so it also appears when the call fails or the caller gives
//! up on it. Responses and errors are returned exactly as the wrapped service
//! produced them.

use std::time::Instant;

use async_trait::async_trait;
use tracing::field::Empty;
use tracing::{Instrument, Span};

use crate::observability::metrics;
use crate::observability::tracing::record_error;
use crate::storage::error::Result;
use crate::storage::types::*;
use crate::storage::StorageService;

/// Logged and traced in place of a password while redaction is on.
pub const REDACTED: &str = "(omitted)";

/// Wraps `next`, adding spans, logs and timing around each call.
pub struct TelemetryMw<S> {
    next: S,
    redact_secrets: bool,
}

impl<S: StorageService> TelemetryMw<S> {
    pub fn new(next: S) -> Self {
        Self {
            next,
            redact_secrets: true,
        }
    }

    /// With `false`, passwords are logged and traced exactly as received.
    pub fn with_redaction(mut self, redact_secrets: bool) -> Self {
        self.redact_secrets = redact_secrets;
        self
    }

    pub fn get_ref(&self) -> &S {
        &self.next
    }

    fn secret<'a>(&self, value: &'a str) -> &'a str {
        if self.redact_secrets {
            REDACTED
        } else {
            value
        }
    }
}

/// Emits the timing line and call metrics when dropped.
struct CallTimer {
    function: &'static str,
    start: Instant,
    outcome: &'static str,
}

impl CallTimer {
    fn start(function: &'static str) -> Self {
        Self {
            function,
            start: Instant::now(),
            outcome: "cancelled",
        }
    }

    /// Note the outcome and flag the span on failure. `result` is returned as is.
    fn observe<T>(&mut self, span: &Span, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.outcome = "ok",
            Err(err) => {
                self.outcome = "error";
                record_error(span, err);
            }
        }
        result
    }
}

impl Drop for CallTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::debug!(duration = ?elapsed, function = self.function);
        metrics::record_call(self.function, self.outcome, elapsed);
    }
}

#[async_trait]
impl<S: StorageService> StorageService for TelemetryMw<S> {
    async fn create(&self, req: StorageCreateRequest) -> Result<StorageCreateResponse> {
        let mut timer = CallTimer::start("Create");

        let password = self.secret(&req.password);
        let span = tracing::info_span!(
            "storage.create",
            storage_type = %req.storage_type,
            endpoint = %req.endpoint,
            system_id = %req.system_id,
            user_name = %req.user_name,
            password = %password,
            insecure = req.insecure,
            otel.status_code = Empty,
            error = Empty,
        );
        tracing::info!(
            parent: &span,
            storage_type = %req.storage_type,
            endpoint = %req.endpoint,
            system_id = %req.system_id,
            user_name = %req.user_name,
            password = %password,
            insecure = req.insecure,
            "Creating storage"
        );

        let result = self.next.create(req).instrument(span.clone()).await;
        timer.observe(&span, result)
    }

    async fn update(&self, req: StorageUpdateRequest) -> Result<StorageUpdateResponse> {
        let mut timer = CallTimer::start("Update");

        let password = self.secret(&req.password);
        let span = tracing::info_span!(
            "storage.update",
            storage_type = %req.storage_type,
            endpoint = %req.endpoint,
            system_id = %req.system_id,
            user_name = %req.user_name,
            password = %password,
            insecure = req.insecure,
            otel.status_code = Empty,
            error = Empty,
        );
        tracing::info!(
            parent: &span,
            storage_type = %req.storage_type,
            endpoint = %req.endpoint,
            system_id = %req.system_id,
            user_name = %req.user_name,
            password = %password,
            insecure = req.insecure,
            "Updating storage"
        );

        let result = self.next.update(req).instrument(span.clone()).await;
        timer.observe(&span, result)
    }

    async fn get(&self, req: StorageGetRequest) -> Result<StorageGetResponse> {
        let mut timer = CallTimer::start("Get");

        let span = tracing::info_span!(
            "storage.get",
            storage_type = %req.storage_type,
            system_id = %req.system_id,
            otel.status_code = Empty,
            error = Empty,
        );
        tracing::info!(
            parent: &span,
            storage_type = %req.storage_type,
            system_id = %req.system_id,
            "Getting storage"
        );

        let result = self.next.get(req).instrument(span.clone()).await;
        timer.observe(&span, result)
    }

    async fn delete(&self, req: StorageDeleteRequest) -> Result<StorageDeleteResponse> {
        let mut timer = CallTimer::start("Delete");

        let span = tracing::info_span!(
            "storage.delete",
            storage_type = %req.storage_type,
            system_id = %req.system_id,
            otel.status_code = Empty,
            error = Empty,
        );
        tracing::info!(
            parent: &span,
            storage_type = %req.storage_type,
            system_id = %req.system_id,
            "Deleting storage"
        );

        let result = self.next.delete(req).instrument(span.clone()).await;
        timer.observe(&span, result)
    }

    async fn list(&self, req: StorageListRequest) -> Result<StorageListResponse> {
        let mut timer = CallTimer::start("List");

        let span = tracing::info_span!("storage.list", otel.status_code = Empty, error = Empty);
        tracing::info!(parent: &span, "Listing storage");

        let result = self.next.list(req).instrument(span.clone()).await;
        timer.observe(&span, result)
    }
}

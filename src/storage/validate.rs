//! Checks a registration against the array before it is stored.
//!
//! # Design Decisions
//! - The endpoint is always contacted over https, whatever scheme was given
//! - `insecure` only relaxes certificate verification, never the scheme
//! - Vendor login flows are not reproduced; a credentialed probe of the
//!   management endpoint stands in for them

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::storage::error::{Result, StorageError};
use crate::storage::types::System;

/// Storage types accepted when no explicit list is configured.
pub const SUPPORTED_STORAGE_TYPES: &[&str] = &["powerflex", "powermax", "powerscale", "isilon"];

/// Decides whether a registration may be stored.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, system_id: &str, storage_type: &str, system: &System) -> Result<()>;
}

#[async_trait]
impl<T: Validator + ?Sized> Validator for std::sync::Arc<T> {
    async fn validate(&self, system_id: &str, storage_type: &str, system: &System) -> Result<()> {
        (**self).validate(system_id, storage_type, system).await
    }
}

#[async_trait]
impl<T: Validator + ?Sized> Validator for Box<T> {
    async fn validate(&self, system_id: &str, storage_type: &str, system: &System) -> Result<()> {
        (**self).validate(system_id, storage_type, system).await
    }
}

/// Stores anything. Used when validation is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

#[async_trait]
impl Validator for AcceptAll {
    async fn validate(&self, _: &str, _: &str, _: &System) -> Result<()> {
        Ok(())
    }
}

/// Validates the storage type, then probes the endpoint with the given credentials.
#[derive(Debug, Clone)]
pub struct SystemValidator {
    supported_types: Vec<String>,
    timeout: Duration,
}

impl SystemValidator {
    pub fn new(supported_types: Vec<String>, timeout: Duration) -> Self {
        Self {
            supported_types,
            timeout,
        }
    }

    fn is_supported(&self, storage_type: &str) -> bool {
        self.supported_types.iter().any(|t| t == storage_type)
    }
}

impl Default for SystemValidator {
    fn default() -> Self {
        Self::new(
            SUPPORTED_STORAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            Duration::from_secs(10),
        )
    }
}

#[async_trait]
impl Validator for SystemValidator {
    async fn validate(&self, system_id: &str, storage_type: &str, system: &System) -> Result<()> {
        tracing::info!(storage_type = %storage_type, system_id = %system_id, "Validating storage");

        if !self.is_supported(storage_type) {
            return Err(StorageError::Unsupported(storage_type.to_string()));
        }

        let url = secure_endpoint(&system.endpoint)?;
        tracing::debug!(endpoint = %url, insecure = system.insecure, "Probing storage endpoint");

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(system.insecure)
            .timeout(self.timeout)
            .build()
            .map_err(|e| StorageError::Internal(format!("building http client: {e}")))?;

        let response = client
            .get(url)
            .basic_auth(&system.user, Some(&system.password))
            .send()
            .await
            .map_err(|e| {
                StorageError::Validation(format!(
                    "failed to connect to {storage_type} {system_id}: {e}"
                ))
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StorageError::Validation(
                format!("{storage_type} authentication failed: {}", response.status()),
            )),
            _ => Ok(()),
        }
    }
}

/// Parse `endpoint` and force its scheme to https.
///
/// A bare `host:port` is accepted and treated as an https address.
pub fn secure_endpoint(endpoint: &str) -> Result<Url> {
    let invalid = |e: &dyn std::fmt::Display| {
        StorageError::Validation(format!("endpoint {endpoint} is invalid: {e}"))
    };

    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let mut url = Url::parse(&candidate).map_err(|e| invalid(&e))?;
    if !url.has_host() {
        return Err(invalid(&"missing host"));
    }

    if url.scheme() != "https" && url.set_scheme("https").is_err() {
        return Err(invalid(&format!("scheme {} cannot be secured", url.scheme())));
    }
    Ok(url)
}

//! Storage configuration service chain.
//!
//! # Data Flow
//! ```text
//! http::storage_handler
//!     → telemetry.rs (TelemetryMw: span, log, timing)
//!     → service.rs (Service: duplicate checks, validation)
//!         → validate.rs (Validator: endpoint + credentials probe)
//!         → store.rs (Store: current registrations)
//! ```
//!
//! # Design Decisions
//! - Every layer implements the same [`StorageService`] trait, so layers nest
//!   by construction and any of them can be removed without touching the rest
//! - Errors propagate unchanged; only the HTTP boundary maps them to statuses

pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod validate;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::StorageError;
pub use service::Service;
pub use store::{MemoryStore, Store};
pub use telemetry::TelemetryMw;
pub use types::*;
pub use validate::{AcceptAll, SystemValidator, Validator};

/// The five operations of the storage configuration service.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn create(&self, req: StorageCreateRequest) -> error::Result<StorageCreateResponse>;

    async fn update(&self, req: StorageUpdateRequest) -> error::Result<StorageUpdateResponse>;

    async fn get(&self, req: StorageGetRequest) -> error::Result<StorageGetResponse>;

    async fn delete(&self, req: StorageDeleteRequest) -> error::Result<StorageDeleteResponse>;

    async fn list(&self, req: StorageListRequest) -> error::Result<StorageListResponse>;
}

#[async_trait]
impl<T: StorageService + ?Sized> StorageService for Arc<T> {
    async fn create(&self, req: StorageCreateRequest) -> error::Result<StorageCreateResponse> {
        (**self).create(req).await
    }

    async fn update(&self, req: StorageUpdateRequest) -> error::Result<StorageUpdateResponse> {
        (**self).update(req).await
    }

    async fn get(&self, req: StorageGetRequest) -> error::Result<StorageGetResponse> {
        (**self).get(req).await
    }

    async fn delete(&self, req: StorageDeleteRequest) -> error::Result<StorageDeleteResponse> {
        (**self).delete(req).await
    }

    async fn list(&self, req: StorageListRequest) -> error::Result<StorageListResponse> {
        (**self).list(req).await
    }
}

#[async_trait]
impl<T: StorageService + ?Sized> StorageService for Box<T> {
    async fn create(&self, req: StorageCreateRequest) -> error::Result<StorageCreateResponse> {
        (**self).create(req).await
    }

    async fn update(&self, req: StorageUpdateRequest) -> error::Result<StorageUpdateResponse> {
        (**self).update(req).await
    }

    async fn get(&self, req: StorageGetRequest) -> error::Result<StorageGetResponse> {
        (**self).get(req).await
    }

    async fn delete(&self, req: StorageDeleteRequest) -> error::Result<StorageDeleteResponse> {
        (**self).delete(req).await
    }

    async fn list(&self, req: StorageListRequest) -> error::Result<StorageListResponse> {
        (**self).list(req).await
    }
}

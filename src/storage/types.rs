//! Request and response shapes exchanged with the storage configuration service.
//!
//! Create/Update carry a full registration, Get/Delete are keyed by
//! `(storage_type, system_id)`, and Get/List return an opaque byte payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Credentials and address of one registered array, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct System {
    pub user: String,
    pub password: String,
    pub endpoint: String,
    pub insecure: bool,
}

/// Registrations of one storage type, keyed by system id.
pub type SystemType = BTreeMap<String, System>;

/// Every registration, keyed by storage type then system id.
pub type Storage = BTreeMap<String, SystemType>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageCreateRequest {
    pub storage_type: String,
    pub endpoint: String,
    pub system_id: String,
    pub user_name: String,
    pub password: String,
    pub insecure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageCreateResponse;

/// Full replacement of an existing registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageUpdateRequest {
    pub storage_type: String,
    pub endpoint: String,
    pub system_id: String,
    pub user_name: String,
    pub password: String,
    pub insecure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageUpdateResponse;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageGetRequest {
    pub storage_type: String,
    pub system_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageGetResponse {
    /// Serialized registration, forwarded verbatim.
    pub storage: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageDeleteRequest {
    pub storage_type: String,
    pub system_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageDeleteResponse;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageListRequest;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageListResponse {
    /// Serialized [`Storage`] listing, forwarded verbatim.
    pub storage: Vec<u8>,
}

impl StorageCreateRequest {
    pub fn system(&self) -> System {
        System {
            user: self.user_name.clone(),
            password: self.password.clone(),
            endpoint: self.endpoint.clone(),
            insecure: self.insecure,
        }
    }
}

impl StorageUpdateRequest {
    pub fn system(&self) -> System {
        System {
            user: self.user_name.clone(),
            password: self.password.clone(),
            endpoint: self.endpoint.clone(),
            insecure: self.insecure,
        }
    }
}

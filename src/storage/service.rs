//! Reference storage configuration service.
//!
//! Keeps registrations in a [`Store`] and consults a [`Validator`] before
//! anything new or changed is persisted.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::storage::error::{Result, StorageError};
use crate::storage::store::Store;
use crate::storage::types::*;
use crate::storage::validate::Validator;
use crate::storage::StorageService;

/// Placeholder returned instead of a stored password.
pub const OMITTED_PASSWORD: &str = "(omitted)";

pub struct Service<K, V> {
    store: K,
    validator: V,
    /// Serializes read-modify-write cycles against the store.
    write_lock: Mutex<()>,
}

impl<K: Store, V: Validator> Service<K, V> {
    pub fn new(store: K, validator: V) -> Self {
        Self {
            store,
            validator,
            write_lock: Mutex::new(()),
        }
    }

    async fn registered(&self, storage_type: &str, system_id: &str) -> Result<(Storage, System)> {
        let existing = self.store.configured_storage().await?;

        let system = existing
            .get(storage_type)
            .ok_or_else(|| {
                StorageError::NotFound(format!("error: storage of type {storage_type} is missing"))
            })?
            .get(system_id)
            .cloned()
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "error: system with ID {system_id} does not exist"
                ))
            })?;

        Ok((existing, system))
    }
}

/// Fails if any id in the comma-separated `system_id` is already registered
/// under `storage_type`.
pub fn check_for_duplicates(existing: &Storage, system_id: &str, storage_type: &str) -> Result<()> {
    let Some(systems) = existing.get(storage_type) else {
        return Ok(());
    };

    match system_id.split(',').find(|id| systems.contains_key(*id)) {
        Some(id) => Err(StorageError::AlreadyExists(format!(
            "error: {storage_type} system with ID {id} is already registered"
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl<K: Store, V: Validator> StorageService for Service<K, V> {
    async fn create(&self, req: StorageCreateRequest) -> Result<StorageCreateResponse> {
        let _guard = self.write_lock.lock().await;

        tracing::debug!("Getting configured storages");
        let mut existing = self.store.configured_storage().await?;

        tracing::debug!("Checking for duplicates");
        check_for_duplicates(&existing, &req.system_id, &req.storage_type)?;

        let system = req.system();
        tracing::debug!("Validating storage");
        self.validator
            .validate(&req.system_id, &req.storage_type, &system)
            .await?;

        tracing::debug!("Applying new storage");
        existing
            .entry(req.storage_type)
            .or_default()
            .insert(req.system_id, system);
        self.store.update_storages(existing).await?;

        Ok(StorageCreateResponse)
    }

    async fn update(&self, req: StorageUpdateRequest) -> Result<StorageUpdateResponse> {
        let _guard = self.write_lock.lock().await;

        tracing::debug!("Getting configured storage");
        let mut existing = self.store.configured_storage().await?;

        let known = existing
            .get(&req.storage_type)
            .is_some_and(|systems| systems.contains_key(&req.system_id));
        if !known {
            return Err(StorageError::NotFound(
                "no matching storage systems to update".to_string(),
            ));
        }

        let system = req.system();
        tracing::debug!("Validating storage");
        self.validator
            .validate(&req.system_id, &req.storage_type, &system)
            .await?;

        tracing::debug!("Applying updated storage");
        existing
            .entry(req.storage_type)
            .or_default()
            .insert(req.system_id, system);
        self.store.update_storages(existing).await?;

        Ok(StorageUpdateResponse)
    }

    async fn get(&self, req: StorageGetRequest) -> Result<StorageGetResponse> {
        let (_, mut system) = self.registered(&req.storage_type, &req.system_id).await?;

        system.password = OMITTED_PASSWORD.to_string();
        let storage = serde_json::to_vec(&system)?;

        Ok(StorageGetResponse { storage })
    }

    async fn delete(&self, req: StorageDeleteRequest) -> Result<StorageDeleteResponse> {
        let _guard = self.write_lock.lock().await;

        let (mut existing, _) = self.registered(&req.storage_type, &req.system_id).await?;

        tracing::debug!("Deleting the storage");
        if let Some(systems) = existing.get_mut(&req.storage_type) {
            systems.remove(&req.system_id);
        }
        self.store.update_storages(existing).await?;

        Ok(StorageDeleteResponse)
    }

    async fn list(&self, _req: StorageListRequest) -> Result<StorageListResponse> {
        tracing::debug!("Getting configured storage");
        let existing = self.store.configured_storage().await?;

        let storage = serde_json::to_vec(&existing)?;
        Ok(StorageListResponse { storage })
    }
}

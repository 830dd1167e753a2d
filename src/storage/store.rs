//! Where the backend keeps registrations between calls.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::storage::error::Result;
use crate::storage::types::Storage;

/// Read and replace the full set of registrations.
#[async_trait]
pub trait Store: Send + Sync {
    /// Snapshot of every configured registration.
    async fn configured_storage(&self) -> Result<Storage>;

    /// Replace the stored registrations with `storage`.
    async fn update_storages(&self, storage: Storage) -> Result<()>;
}

/// Process-local store. Readers see a consistent snapshot while a writer
/// swaps in the next one.
#[derive(Default)]
pub struct MemoryStore {
    current: ArcSwap<Storage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn configured_storage(&self) -> Result<Storage> {
        Ok(self.current.load().as_ref().clone())
    }

    async fn update_storages(&self, storage: Storage) -> Result<()> {
        self.current.store(Arc::new(storage));
        Ok(())
    }
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn configured_storage(&self) -> Result<Storage> {
        (**self).configured_storage().await
    }

    async fn update_storages(&self, storage: Storage) -> Result<()> {
        (**self).update_storages(storage).await
    }
}

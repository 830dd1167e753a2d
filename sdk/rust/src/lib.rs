//! Client for the storage proxy's `/proxy/storage/` resource.

pub mod client;

pub use client::{ClientError, StorageClient, StorageSystem};

//! Storage abstractions for the vault core and its barrier.
//!
//! `StorageBackend` is the raw key/value contract every physical or
//! database-backed store implements. `SecurityBarrier` sits on top of a
//! `StorageBackend` and is itself one (see `barrier_aes_gcm`), so the core
//! can treat "encrypted storage" and "storage" interchangeably.

pub mod barrier_aes_gcm;
pub mod barrier_store;
pub mod metadata_store;
pub mod physical_file;

use std::sync::Arc;
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::errors::VaultResult;

pub use barrier_store::BarrierStore;
pub use metadata_store::MetadataStore;
pub use physical_file::FileBackend;

/// Path the barrier's own init blob is stored under, on whichever
/// `StorageBackend` it wraps.
pub const BARRIER_INIT_PATH: &str = "core/barrier-init";

/// A flat key/value store. Keys are `/`-free of leading slashes; `list`
/// returns keys (or key segments) under a prefix.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> VaultResult<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: &[u8]) -> VaultResult<()>;
    async fn delete(&self, key: &str) -> VaultResult<()>;
    async fn list(&self, prefix: &str) -> VaultResult<Vec<String>>;
}

/// Encryption boundary around a `StorageBackend`. A barrier starts sealed;
/// no read or write succeeds until `unseal` has supplied the key.
#[async_trait]
pub trait SecurityBarrier: Send + Sync {
    async fn inited(&self) -> VaultResult<bool>;
    async fn init(&self, kek: &[u8]) -> VaultResult<()>;
    fn generate_key(&self) -> VaultResult<Zeroizing<Vec<u8>>>;
    fn key_length_range(&self) -> (usize, usize);
    fn sealed(&self) -> VaultResult<bool>;
    async fn unseal(&self, kek: &[u8]) -> VaultResult<()>;
    fn seal(&self) -> VaultResult<()>;
    fn derive_hmac_key(&self) -> VaultResult<Vec<u8>>;
}

/// Routes core bootstrap metadata (seal config, barrier init blob) to the
/// Postgres-backed metadata store, and everything else to the barrier-encrypted
/// file store -- so the core's own barrier can wrap this adapter without ever
/// reading its init blob back through a second, not-yet-unsealed barrier.
pub struct StorageAdapter {
    metadata: Arc<MetadataStore>,
    barrier: Arc<BarrierStore>,
}

impl StorageAdapter {
    pub fn new(metadata: Arc<MetadataStore>, barrier: Arc<BarrierStore>) -> Self {
        Self { metadata, barrier }
    }

    fn route(&self, key: &str) -> &(dyn StorageBackend) {
        if key.starts_with("core/") {
            &*self.metadata
        } else {
            &*self.barrier
        }
    }
}

#[async_trait]
impl StorageBackend for StorageAdapter {
    async fn get(&self, key: &str) -> VaultResult<Option<Vec<u8>>> {
        self.route(key).get(key).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> VaultResult<()> {
        self.route(key).put(key, value).await
    }

    async fn delete(&self, key: &str) -> VaultResult<()> {
        self.route(key).delete(key).await
    }

    async fn list(&self, prefix: &str) -> VaultResult<Vec<String>> {
        self.route(prefix).list(prefix).await
    }
}

//! Banner persistence.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     Admin RPC handlers / Renderer       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            BannerRegistry               │
//! │   (slug cache, invalidated on writes)   │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          BannerStore Trait              │
//! └────────────────────┬────────────────────┘
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │MemoryBannerStore│    │ JsonFileBannerStore │
//! └─────────────────┘    └─────────────────────┘
//! ```

mod file;
mod memory;
mod registry;
mod table;

pub use file::JsonFileBannerStore;
pub use memory::MemoryBannerStore;
pub use registry::{BannerRegistry, DEFAULT_BANNER_CACHE_CAPACITY};

use async_trait::async_trait;

use crate::banner::{Banner, BannerData};
use crate::error::StoreError;

/// Persistence backend for banners.
///
/// Implementations enforce slug uniqueness on both create and update. Each
/// write replaces a banner as a single unit.
#[async_trait]
pub trait BannerStore: Send + Sync {
    /// Insert a new banner and return its id.
    async fn create(&self, data: BannerData) -> Result<u64, StoreError>;

    /// Replace every field of an existing banner.
    ///
    /// `created_at` is kept and `updated_at` is refreshed.
    async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: u64) -> Result<Option<Banner>, StoreError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Banner>, StoreError>;

    /// All banners, newest first.
    async fn list_all(&self) -> Result<Vec<Banner>, StoreError>;

    async fn delete(&self, id: u64) -> Result<(), StoreError>;
}

/// Runtime-selected backend, so the server can pick memory or file storage
/// from configuration without becoming generic over it.
pub enum AnyBannerStore {
    Memory(MemoryBannerStore),
    File(JsonFileBannerStore),
}

#[async_trait]
impl BannerStore for AnyBannerStore {
    async fn create(&self, data: BannerData) -> Result<u64, StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.create(data).await,
            AnyBannerStore::File(s) => s.create(data).await,
        }
    }

    async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.update(id, data).await,
            AnyBannerStore::File(s) => s.update(id, data).await,
        }
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Banner>, StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.get_by_id(id).await,
            AnyBannerStore::File(s) => s.get_by_id(id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Banner>, StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.get_by_slug(slug).await,
            AnyBannerStore::File(s) => s.get_by_slug(slug).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<Banner>, StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.list_all().await,
            AnyBannerStore::File(s) => s.list_all().await,
        }
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        match self {
            AnyBannerStore::Memory(s) => s.delete(id).await,
            AnyBannerStore::File(s) => s.delete(id).await,
        }
    }
}

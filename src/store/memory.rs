//! Volatile banner store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::banner::{Banner, BannerData};
use crate::error::StoreError;

use super::table::BannerTable;
use super::BannerStore;

/// Banner store that keeps everything in process memory.
///
/// Used when the server runs without a data file, and throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryBannerStore {
    table: RwLock<BannerTable>,
}

impl MemoryBannerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BannerStore for MemoryBannerStore {
    async fn create(&self, data: BannerData) -> Result<u64, StoreError> {
        self.table.write().await.insert(data)
    }

    async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError> {
        self.table.write().await.replace(id, data)
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Banner>, StoreError> {
        Ok(self.table.read().await.get(id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Banner>, StoreError> {
        Ok(self.table.read().await.find_slug(slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Banner>, StoreError> {
        Ok(self.table.read().await.newest_first())
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.table.write().await.remove(id).map(|_| ())
    }
}

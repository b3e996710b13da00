//! Banner store persisted to a single JSON file.
//!
//! Every write rewrites the file through a temporary sibling and an atomic
//! rename, so a crash never leaves a half-written table behind. A write
//! only becomes visible in memory after it has reached disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::banner::{Banner, BannerData};
use crate::error::StoreError;

use super::table::BannerTable;
use super::BannerStore;

/// Banner store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileBannerStore {
    path: PathBuf,
    table: RwLock<BannerTable>,
}

impl JsonFileBannerStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<BannerTable>(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No banner file at {}, starting empty", path.display());
                BannerTable::default()
            }
            Err(e) => return Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        };

        debug!(banners = table.len(), path = %path.display(), "Opened banner file");

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `mutate` to a copy of the table, persist it, then publish it.
    async fn write_with<T>(
        &self,
        mutate: impl FnOnce(&mut BannerTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let result = mutate(&mut next)?;
        persist(&self.path, &next).await?;
        *table = next;
        Ok(result)
    }
}

async fn persist(path: &Path, table: &BannerTable) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(table).map_err(|e| StoreError::Io(e.to_string()))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json)
        .await
        .map_err(|e| StoreError::Io(format!("{}: {}", tmp.display(), e)))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

#[async_trait]
impl BannerStore for JsonFileBannerStore {
    async fn create(&self, data: BannerData) -> Result<u64, StoreError> {
        self.write_with(|table| table.insert(data)).await
    }

    async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError> {
        self.write_with(|table| table.replace(id, data)).await
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
        self.write_with(|table| table.remove(id).map(|_| ())).await
    }
}

//! Banner registry: the store plus a slug cache for the render path.
//!
//! Embeds resolve banners by slug on every page render, while banners change
//! rarely. The registry keeps recently resolved banners in an LRU cache and
//! drops affected entries whenever a write goes through it.
//!
//! # Consistency
//!
//! A render that read the store before a concurrent write finished must not
//! repopulate the cache with the stale banner. Every write bumps a
//! generation counter under the cache lock; a lookup only caches its result
//! if the generation is unchanged since it started. Writes drop entries by
//! banner id, so an entry cached under a slug the banner held only briefly
//! is dropped too.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::banner::{Banner, BannerData};
use crate::error::StoreError;

use super::BannerStore;

/// Default number of banners kept in the slug cache.
pub const DEFAULT_BANNER_CACHE_CAPACITY: usize = 100;

struct SlugCache {
    entries: LruCache<String, Arc<Banner>>,
    generation: u64,
}

/// Store front-end with slug caching.
pub struct BannerRegistry<S: BannerStore> {
    store: S,
    cache: Mutex<SlugCache>,
}

impl<S: BannerStore> BannerRegistry<S> {
    /// Create a registry with the default cache capacity.
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, DEFAULT_BANNER_CACHE_CAPACITY)
    }

    /// Create a registry caching up to `capacity` banners.
    pub fn with_capacity(store: S, capacity: usize) -> Self {
        Self {
            store,
            cache: Mutex::new(SlugCache {
                entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
                generation: 0,
            }),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a banner by slug, serving from the cache when possible.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Arc<Banner>>, StoreError> {
        let generation = {
            let mut cache = self.cache.lock().await;
            if let Some(banner) = cache.entries.get(slug) {
                debug!(slug, "Banner cache hit");
                return Ok(Some(banner.clone()));
            }
            cache.generation
        };

        debug!(slug, "Banner cache miss");
        let Some(banner) = self.store.get_by_slug(slug).await? else {
            return Ok(None);
        };
        let banner = Arc::new(banner);

        let mut cache = self.cache.lock().await;
        if cache.generation == generation {
            cache.entries.put(slug.to_string(), banner.clone());
        }
        Ok(Some(banner))
    }

    /// Fetch a banner by id, bypassing the cache.
    pub async fn get_by_id(&self, id: u64) -> Result<Option<Banner>, StoreError> {
        self.store.get_by_id(id).await
    }

    /// All banners, newest first.
    pub async fn list_all(&self) -> Result<Vec<Banner>, StoreError> {
        self.store.list_all().await
    }

    /// Create a banner and return its id.
    pub async fn create(&self, data: BannerData) -> Result<u64, StoreError> {
        let slug = data.slug.clone();
        let id = self.store.create(data).await?;
        self.invalidate(id, Some(slug.as_str())).await;
        info!(id, slug = %slug, "Created banner");
        Ok(id)
    }

    /// Replace a banner.
    pub async fn update(&self, id: u64, data: BannerData) -> Result<(), StoreError> {
        let slug = data.slug.clone();
        let result = self.store.update(id, data).await;

        // Invalidate even on failure; the write may have partially applied
        self.invalidate(id, Some(slug.as_str())).await;

        result?;
        info!(id, slug = %slug, "Updated banner");
        Ok(())
    }

    /// Delete a banner.
    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        let result = self.store.delete(id).await;
        self.invalidate(id, None).await;

        result?;
        info!(id, "Deleted banner");
        Ok(())
    }

    /// Number of banners currently cached.
    pub async fn cached_count(&self) -> usize {
        self.cache.lock().await.entries.len()
    }

    /// Drop every cached banner.
    pub async fn clear(&self) {
        let mut cache = self.cache.lock().await;
        cache.entries.clear();
        cache.generation += 1;
    }

    /// Drop every entry cached for banner `id`, under whatever slug, plus
    /// any entry under `slug`.
    async fn invalidate(&self, id: u64, slug: Option<&str>) {
        let mut cache = self.cache.lock().await;
        let stale: Vec<String> = cache
            .entries
            .iter()
            .filter(|(key, banner)| banner.id == id || Some(key.as_str()) == slug)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            cache.entries.pop(&key);
        }
        cache.generation += 1;
    }
}

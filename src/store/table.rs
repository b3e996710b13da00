//! In-memory banner table shared by the store backends.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::banner::{Banner, BannerData};
use crate::error::StoreError;

/// Banner rows keyed by id, plus the id sequence.
///
/// This is also the on-disk shape of the JSON file backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerTable {
    /// Next id to hand out; ids are never reused
    next_id: u64,

    #[serde(with = "banner_rows")]
    rows: BTreeMap<u64, Banner>,
}

impl Default for BannerTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl BannerTable {
    pub fn insert(&mut self, data: BannerData) -> Result<u64, StoreError> {
        self.ensure_slug_free(&data.slug, None)?;

        let id = self.next_id;
        let now = Utc::now();
        self.rows.insert(
            id,
            Banner {
                id,
                name: data.name,
                slug: data.slug,
                slides: data.slides,
                settings: data.settings,
                created_at: now,
                updated_at: now,
            },
        );
        self.next_id += 1;
        Ok(id)
    }

    pub fn replace(&mut self, id: u64, data: BannerData) -> Result<(), StoreError> {
        if !self.rows.contains_key(&id) {
            return Err(StoreError::NotFound { id });
        }
        self.ensure_slug_free(&data.slug, Some(id))?;

        if let Some(banner) = self.rows.get_mut(&id) {
            banner.name = data.name;
            banner.slug = data.slug;
            banner.slides = data.slides;
            banner.settings = data.settings;
            banner.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<Banner, StoreError> {
        self.rows.remove(&id).ok_or(StoreError::NotFound { id })
    }

    pub fn get(&self, id: u64) -> Option<&Banner> {
        self.rows.get(&id)
    }

    pub fn find_slug(&self, slug: &str) -> Option<&Banner> {
        self.rows.values().find(|b| b.slug == slug)
    }

    /// All banners, newest first (ties broken by descending id).
    pub fn newest_first(&self) -> Vec<Banner> {
        let mut banners: Vec<Banner> = self.rows.values().cloned().collect();
        banners.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        banners
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn ensure_slug_free(&self, slug: &str, owner: Option<u64>) -> Result<(), StoreError> {
        match self.find_slug(slug) {
            Some(existing) if Some(existing.id) != owner => Err(StoreError::SlugTaken {
                slug: slug.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Rows are written as a plain array so the file stays readable.
mod banner_rows {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::banner::Banner;

    pub fn serialize<S: Serializer>(
        rows: &BTreeMap<u64, Banner>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let banners: Vec<&Banner> = rows.values().collect();
        banners.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u64, Banner>, D::Error> {
        let banners = Vec::<Banner>::deserialize(deserializer)?;
        Ok(banners.into_iter().map(|b| (b.id, b)).collect())
    }
}

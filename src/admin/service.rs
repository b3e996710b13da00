//! Admin operations behind the RPC endpoints.
//!
//! Every operation validates before it touches the store: a request that
//! fails validation never reaches a backend.

use tracing::debug;

use crate::banner::{Banner, BannerData};
use crate::error::{AdminError, StoreError};
use crate::store::{BannerRegistry, BannerStore};

use super::rpc::{BannerSummary, SaveRequest};

pub const SAVED_MESSAGE: &str = "Banner saved successfully";
pub const DELETED_MESSAGE: &str = "Banner deleted successfully";

/// Create or replace a banner from an editor submission. Returns its id.
pub async fn save_banner<S: BannerStore>(
    registry: &BannerRegistry<S>,
    request: &SaveRequest,
) -> Result<u64, AdminError> {
    let data = BannerData::from_submission(
        &request.name,
        &request.slug,
        &request.settings,
        &request.slides,
    )?;

    match request.target_id() {
        Some(id) => {
            debug!(id, slug = %data.slug, "Saving existing banner");
            registry.update(id, data).await?;
            Ok(id)
        }
        None => {
            debug!(slug = %data.slug, "Saving new banner");
            Ok(registry.create(data).await?)
        }
    }
}

/// Load a banner for editing.
pub async fn fetch_banner<S: BannerStore>(
    registry: &BannerRegistry<S>,
    id: u64,
) -> Result<Banner, AdminError> {
    registry
        .get_by_id(id)
        .await?
        .ok_or(AdminError::Store(StoreError::NotFound { id }))
}

pub async fn delete_banner<S: BannerStore>(
    registry: &BannerRegistry<S>,
    id: u64,
) -> Result<(), AdminError> {
    registry.delete(id).await?;
    Ok(())
}

/// Rows for the admin listing, newest first.
pub async fn list_banners<S: BannerStore>(
    registry: &BannerRegistry<S>,
) -> Result<Vec<BannerSummary>, AdminError> {
    let banners = registry.list_all().await?;
    Ok(banners.iter().map(BannerSummary::from).collect())
}

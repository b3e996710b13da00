//! Admin RPC request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::banner::Banner;

/// `POST /admin/banners/save`
///
/// `settings` and `slides` are JSON documents encoded as strings, exactly as
/// the editor submits them. A missing or zero `id` creates a banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub settings: String,
    #[serde(default)]
    pub slides: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl SaveRequest {
    /// Id of the banner being edited, if this is an update.
    pub fn target_id(&self) -> Option<u64> {
        self.id.filter(|id| *id != 0)
    }
}

/// `POST /admin/banners/fetch` and `POST /admin/banners/delete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRequest {
    #[serde(default)]
    pub nonce: String,
    pub id: u64,
}

pub type FetchRequest = IdRequest;
pub type DeleteRequest = IdRequest;

/// `POST /admin/banners/list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub nonce: String,
}

/// One row of the admin banner listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerSummary {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub shortcode: String,
    pub slide_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Banner> for BannerSummary {
    fn from(banner: &Banner) -> Self {
        Self {
            id: banner.id,
            name: banner.name.clone(),
            slug: banner.slug.clone(),
            shortcode: banner.shortcode(),
            slide_count: banner.slides.len(),
            created_at: banner.created_at,
        }
    }
}

/// Response envelope shared by every admin endpoint.
///
/// `ok` tells success from failure; the other fields are present only when
/// they carry something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banners: Option<Vec<BannerSummary>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    fn empty(ok: bool) -> Self {
        Self {
            ok,
            message: None,
            id: None,
            banner: None,
            banners: None,
            error: None,
        }
    }

    pub fn saved(id: u64, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            id: Some(id),
            ..Self::empty(true)
        }
    }

    pub fn banner(banner: Banner) -> Self {
        Self {
            banner: Some(banner),
            ..Self::empty(true)
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(true)
        }
    }

    pub fn listing(banners: Vec<BannerSummary>) -> Self {
        Self {
            banners: Some(banners),
            ..Self::empty(true)
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(false)
        }
    }
}

//! Banner data model.
//!
//! A [`Banner`] is a named, slug-addressed, ordered list of [`Slide`]s plus a
//! [`SettingsOverride`]. Banners are written as a unit: the store only ever
//! sees a complete, validated [`BannerData`].

mod settings;
mod slide;
mod slug;

pub use settings::{
    Breakpoint, Settings, SettingsOverride, DEFAULT_ANIMATION_SPEED, DEFAULT_AUTOPLAY_SPEED,
    DEFAULT_MOBILE_BREAKPOINT, DEFAULT_SLIDES_TO_SHOW,
};
pub use slide::{sanitize_text, sanitize_url, Slide};
pub use slug::{is_valid_slug, normalize_slug, slugify};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Name of the embed tag, as in `[abc_banner slug="home"]`.
pub const SHORTCODE_TAG: &str = "abc_banner";

/// A stored banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub settings: SettingsOverride,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Banner {
    /// Resolve this banner's settings against the process-wide default.
    pub fn resolved_settings(&self, defaults: &Settings) -> Settings {
        defaults.merged(&self.settings)
    }

    /// The embed reference that renders this banner.
    pub fn shortcode(&self) -> String {
        format!("[{} slug=\"{}\"]", SHORTCODE_TAG, self.slug)
    }
}

/// Validated input for creating or replacing a banner.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerData {
    pub name: String,
    pub slug: String,
    pub slides: Vec<Slide>,
    pub settings: SettingsOverride,
}

impl BannerData {
    /// Validate and sanitize a raw save submission.
    ///
    /// `settings_json` and `slides_json` are the JSON-encoded form fields as
    /// sent by the editor. Checks run in the order the editor reports them:
    /// name/slug, slide payload, settings payload, slide count, slide images.
    pub fn from_submission(
        name: &str,
        slug: &str,
        settings_json: &str,
        slides_json: &str,
    ) -> Result<Self, ValidationError> {
        let name = sanitize_text(name);
        let slug = normalize_slug(&sanitize_text(slug));
        if name.is_empty() || slug.is_empty() {
            return Err(ValidationError::MissingNameOrSlug);
        }
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug(slug));
        }

        let slides: Vec<Slide> = serde_json::from_str(slides_json)
            .map_err(|e| ValidationError::InvalidSlides(e.to_string()))?;
        let settings: SettingsOverride = serde_json::from_str(settings_json)
            .map_err(|e| ValidationError::InvalidSettings(e.to_string()))?;

        Self::new(name, slug, slides, settings)
    }

    /// Validate already-decoded fields.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        slides: Vec<Slide>,
        settings: SettingsOverride,
    ) -> Result<Self, ValidationError> {
        let name = sanitize_text(&name.into());
        let slug = normalize_slug(&slug.into());
        if name.is_empty() || slug.is_empty() {
            return Err(ValidationError::MissingNameOrSlug);
        }
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug(slug));
        }
        if slides.is_empty() {
            return Err(ValidationError::NoSlides);
        }

        let slides: Vec<Slide> = slides.iter().map(Slide::sanitized).collect();
        if let Some(position) = slides.iter().position(|s| s.image.is_empty()) {
            return Err(ValidationError::SlideMissingImage {
                position: position + 1,
            });
        }

        Ok(Self {
            name,
            slug,
            slides,
            settings,
        })
    }
}

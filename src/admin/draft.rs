//! Banner editor state.
//!
//! A [`BannerDraft`] is what the admin editor holds while a banner is being
//! created or edited. It is a plain value: resetting the editor means
//! building a new one. [`BannerDraft::collect`] turns it into the request
//! the save endpoint expects, rejecting incomplete drafts before anything
//! is sent.

use serde::{Deserialize, Serialize};

use crate::banner::{slugify, Banner, Breakpoint, Settings, SettingsOverride, Slide};
use crate::error::ValidationError;

use super::rpc::{DeleteRequest, SaveRequest};

/// Editor state for one banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerDraft {
    /// Set when editing an existing banner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    /// Values of the editor's settings controls
    pub settings: Settings,

    /// Breakpoints stored with the banner; not editable, carried through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<Vec<Breakpoint>>,

    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl BannerDraft {
    /// An empty editor with every control at its default.
    pub fn blank(defaults: &Settings) -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            settings: defaults.clone(),
            responsive: None,
            slides: Vec::new(),
        }
    }

    /// Load a fetched banner into the editor.
    pub fn populate(banner: &Banner, defaults: &Settings) -> Self {
        Self {
            id: Some(banner.id),
            name: banner.name.clone(),
            slug: banner.slug.clone(),
            settings: banner.resolved_settings(defaults),
            responsive: banner.settings.responsive.clone(),
            slides: banner.slides.clone(),
        }
    }

    /// Fill an empty slug from the name. Returns the slug.
    pub fn derive_slug(&mut self) -> &str {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.name);
        }
        &self.slug
    }

    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Remove the slide at `index`, if there is one.
    pub fn remove_slide(&mut self, index: usize) -> Option<Slide> {
        (index < self.slides.len()).then(|| self.slides.remove(index))
    }

    /// The override the editor submits: every control pinned, breakpoints
    /// only when the banner had its own.
    pub fn settings_override(&self) -> SettingsOverride {
        SettingsOverride {
            responsive: self.responsive.clone(),
            ..SettingsOverride::pinned(&self.settings)
        }
    }

    /// Validate and build the save request.
    pub fn collect(&self, nonce: impl Into<String>) -> Result<SaveRequest, ValidationError> {
        let name = self.name.trim();
        let slug = self.slug.trim();
        if name.is_empty() || slug.is_empty() {
            return Err(ValidationError::MissingNameOrSlug);
        }
        if self.slides.is_empty() {
            return Err(ValidationError::NoSlides);
        }

        let settings = serde_json::to_string(&self.settings_override())
            .map_err(|e| ValidationError::InvalidSettings(e.to_string()))?;
        let slides = serde_json::to_string(&self.slides)
            .map_err(|e| ValidationError::InvalidSlides(e.to_string()))?;

        Ok(SaveRequest {
            nonce: nonce.into(),
            name: name.to_string(),
            slug: slug.to_string(),
            settings,
            slides,
            id: self.id,
        })
    }

    /// Start deleting the banner being edited.
    pub fn delete_intent(&self) -> Option<DeleteIntent> {
        self.id.map(DeleteIntent::new)
    }
}

/// A pending delete awaiting the administrator's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a delete only happens once the intent is confirmed"]
pub struct DeleteIntent {
    id: u64,
}

impl DeleteIntent {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Confirm and produce the delete request.
    pub fn confirm(self, nonce: impl Into<String>) -> DeleteRequest {
        DeleteRequest {
            nonce: nonce.into(),
            id: self.id,
        }
    }

    /// Abandon the delete.
    pub fn cancel(self) {}
}

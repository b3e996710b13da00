//! The data handed from the server to the carousel widget.

use serde::{Deserialize, Serialize};

use crate::banner::{Banner, Settings, Slide};

/// Image `loading` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    Eager,
    Lazy,
}

/// Image `fetchpriority` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchPriority {
    High,
    Auto,
}

/// Image `decoding` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
    Sync,
    Async,
}

impl Loading {
    pub fn as_str(&self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }
}

impl FetchPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchPriority::High => "high",
            FetchPriority::Auto => "auto",
        }
    }
}

impl Decoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decoding::Sync => "sync",
            Decoding::Async => "async",
        }
    }
}

/// Loading hints for the image at a zero-based display index.
///
/// The first two slides load eagerly since one of them is on screen and the
/// other peeks in; only the very first gets high fetch priority and
/// synchronous decoding.
pub fn image_hints(index: usize) -> (Loading, FetchPriority, Decoding) {
    let loading = if index < 2 {
        Loading::Eager
    } else {
        Loading::Lazy
    };
    if index == 0 {
        (loading, FetchPriority::High, Decoding::Sync)
    } else {
        (loading, FetchPriority::Auto, Decoding::Async)
    }
}

/// One slide as rendered for the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideView {
    /// Display position (0-based)
    pub index: usize,

    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub alt_text: String,

    pub loading: Loading,
    pub fetchpriority: FetchPriority,
    pub decoding: Decoding,
}

impl SlideView {
    pub fn new(index: usize, slide: &Slide) -> Self {
        let (loading, fetchpriority, decoding) = image_hints(index);
        Self {
            index,
            image: slide.image.clone(),
            link: slide.link.clone(),
            title: slide.title.clone(),
            alt_text: slide.alt().to_string(),
            loading,
            fetchpriority,
            decoding,
        }
    }
}

/// Resolved settings plus slides for one banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub slug: String,
    pub settings: Settings,
    pub slides: Vec<SlideView>,
}

impl RenderPayload {
    /// Build the payload for a banner, resolving its settings.
    pub fn from_banner(banner: &Banner, defaults: &Settings) -> Self {
        Self {
            slug: banner.slug.clone(),
            settings: banner.resolved_settings(defaults),
            slides: banner
                .slides
                .iter()
                .enumerate()
                .map(|(index, slide)| SlideView::new(index, slide))
                .collect(),
        }
    }

    /// Image URL of the first slide, if any.
    pub fn first_image(&self) -> Option<&str> {
        self.slides.first().map(|s| s.image.as_str())
    }
}

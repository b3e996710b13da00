//! Deferred image loading.
//!
//! Lazy images show an inline SVG placeholder until they scroll into view.
//! Each image is swapped to its real source at most once, then forgotten.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::render::{Decoding, FetchPriority, Loading, SlideView};

/// Placeholder size used when an image has no intrinsic dimensions.
pub const DEFAULT_PLACEHOLDER_WIDTH: u32 = 300;
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 200;

/// Inline SVG data URI with the given dimensions.
pub fn placeholder_src(width: Option<u32>, height: Option<u32>) -> String {
    let width = width.unwrap_or(DEFAULT_PLACEHOLDER_WIDTH);
    let height = height.unwrap_or(DEFAULT_PLACEHOLDER_HEIGHT);
    let svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\"></svg>",
        width, height, width, height
    );
    format!("data:image/svg+xml,{}", urlencoding::encode(&svg))
}

/// The widget's view of one `<img>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    /// Currently displayed source
    pub src: String,

    /// Real source of a deferred image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_src: Option<String>,

    pub loading: Loading,
    pub fetchpriority: FetchPriority,
    pub decoding: Decoding,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Set once the real source has been swapped in
    #[serde(default)]
    pub loaded: bool,
}

impl ImageElement {
    pub fn new(src: impl Into<String>, loading: Loading) -> Self {
        Self {
            src: src.into(),
            data_src: None,
            loading,
            fetchpriority: FetchPriority::Auto,
            decoding: Decoding::Async,
            width: None,
            height: None,
            loaded: false,
        }
    }

    /// Image element for a rendered slide.
    pub fn from_view(view: &SlideView) -> Self {
        let data_src = (view.loading == Loading::Lazy).then(|| view.image.clone());
        Self {
            src: view.image.clone(),
            data_src,
            loading: view.loading,
            fetchpriority: view.fetchpriority,
            decoding: view.decoding,
            width: None,
            height: None,
            loaded: false,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Force eager, high-priority, synchronous loading.
    pub fn prioritize(&mut self) {
        self.loading = Loading::Eager;
        self.fetchpriority = FetchPriority::High;
        self.decoding = Decoding::Sync;
    }

    fn load(&mut self) {
        if let Some(real) = self.data_src.take() {
            self.src = real;
        }
        self.loaded = true;
    }
}

/// Tracks which lazy images are still waiting to intersect the viewport.
#[derive(Debug, Default)]
pub struct LazyLoader {
    observing: BTreeSet<usize>,
}

impl LazyLoader {
    /// Prepare every lazy image in `images`.
    ///
    /// With intersection observation available, lazy images get a placeholder
    /// and are observed. Without it they load right away.
    pub fn init(images: &mut [&mut ImageElement], observation_available: bool) -> Self {
        let mut observing = BTreeSet::new();
        for (index, image) in images.iter_mut().enumerate() {
            if image.loading != Loading::Lazy || image.loaded {
                continue;
            }
            if image.data_src.is_none() {
                image.data_src = Some(image.src.clone());
            }
            if observation_available {
                image.src = placeholder_src(image.width, image.height);
                observing.insert(index);
            } else {
                image.load();
            }
        }
        Self { observing }
    }

    /// Handle an intersection report. Returns the indices that loaded.
    pub fn on_intersect(&mut self, images: &mut [&mut ImageElement], visible: &[usize]) -> Vec<usize> {
        let mut loaded = Vec::new();
        for &index in visible {
            if !self.observing.remove(&index) {
                continue;
            }
            if let Some(image) = images.get_mut(index) {
                image.load();
                loaded.push(index);
            }
        }
        loaded
    }

    pub fn is_observing(&self, index: usize) -> bool {
        self.observing.contains(&index)
    }

    pub fn observed_count(&self) -> usize {
        self.observing.len()
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.observing.clear();
    }
}
